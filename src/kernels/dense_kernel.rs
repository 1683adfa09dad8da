//! Dense projection kernel.
//!
//! Computes `output = input · kernel + bias` for a full batch, similar to the
//! Dense layer in common deep learning frameworks, but restructured into tiles
//! with an explicit halving reduction per output element.

use crate::buffers::{TileBuffer, load_column};
use crate::errors::InferenceResult;
use crate::model_parameters::{DenseParameters, check_len};
use crate::reduction::tree_reduce;
use crate::shape::ModelShape;

/// Tiled dense projection over `fc_batch_size` rows.
///
/// The reduction width is `fc_input_size`, a power of two, so every round of the
/// tree halves exactly.
pub struct DenseKernel<'a> {
    shape: &'a ModelShape,
    params: &'a DenseParameters,
}

impl<'a> DenseKernel<'a> {
    /// Creates the kernel after validating the shape and checking the parameters against it.
    pub fn new(shape: &'a ModelShape, params: &'a DenseParameters) -> InferenceResult<Self> {
        shape.validate()?;
        check_len("dense_kernel", shape.fc_kernel_len(), params.kernel.len())?;
        check_len("dense_bias", shape.fc_output_size, params.bias.len())?;
        Ok(Self { shape, params })
    }

    /// Projects `input` (`fc_batch_size × fc_input_size`) into `output`
    /// (`fc_batch_size × fc_output_size`).
    pub fn apply(&self, input: &[f32], output: &mut [f32]) -> InferenceResult<()> {
        let shape = self.shape;
        check_len(
            "dense_input",
            shape.fc_batch_size * shape.fc_input_size,
            input.len(),
        )?;
        check_len("dense_output", shape.fc_output_len(), output.len())?;

        let tile_batch = shape.tile_batch;
        let mut input_tile = TileBuffer::new(tile_batch, shape.fc_input_size);
        let mut output_tile = TileBuffer::new(tile_batch, shape.fc_output_size);
        let mut products = TileBuffer::new(tile_batch, shape.fc_input_size);
        let mut kernel_column = vec![0.0f32; shape.fc_input_size];

        for tile_index in 0..shape.fc_batch_size / tile_batch {
            let start_row = tile_index * tile_batch;
            input_tile.load_rows(input, start_row);

            for column in 0..shape.fc_output_size {
                load_column(
                    &self.params.kernel,
                    shape.fc_output_size,
                    column,
                    &mut kernel_column,
                );
                Self::compute_column(
                    &input_tile,
                    &kernel_column,
                    &mut products,
                    &mut output_tile,
                    column,
                );
            }

            self.save_tile(&output_tile, output, start_row);
        }

        Ok(())
    }

    /// Reduces `input_row · kernel_column` for every row of the tile into
    /// column `column` of `output_tile`.
    #[inline(always)]
    fn compute_column(
        input_tile: &TileBuffer,
        kernel_column: &[f32],
        products: &mut TileBuffer,
        output_tile: &mut TileBuffer,
        column: usize,
    ) {
        for row in 0..input_tile.rows() {
            let work = products.row_mut(row);
            for ((product, &weight), &value) in work
                .iter_mut()
                .zip(kernel_column.iter())
                .zip(input_tile.row(row).iter())
            {
                *product = weight * value;
            }
            output_tile.row_mut(row)[column] = tree_reduce(work);
        }
    }

    /// Adds the bias and writes the tile to the output rows starting at `start_row`.
    #[inline(always)]
    fn save_tile(&self, output_tile: &TileBuffer, output: &mut [f32], start_row: usize) {
        let width = self.shape.fc_output_size;
        for row in 0..output_tile.rows() {
            let start = (start_row + row) * width;
            for ((out, &bias), &reduced) in output[start..start + width]
                .iter_mut()
                .zip(self.params.bias.iter())
                .zip(output_tile.row(row).iter())
            {
                *out = bias + reduced;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InferenceError;

    const DELTA: f32 = 1e-5;

    fn shape() -> ModelShape {
        // 4 rows in tiles of 2, 4 -> 3 projection
        ModelShape::new(1, 1, 4, 3, 4, 2, 4, 1)
    }

    #[test]
    fn test_dense_identity_block() {
        let shape = shape();
        // kernel[i][j] = 1 if i == j
        let mut kernel = vec![0.0; 12];
        for i in 0..3 {
            kernel[i * 3 + i] = 1.0;
        }
        let params = DenseParameters {
            kernel,
            bias: vec![0.5, -0.5, 0.0],
        };
        let dense = DenseKernel::new(&shape, &params).unwrap();

        let input: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let mut output = vec![0.0; 12];
        dense.apply(&input, &mut output).unwrap();

        for row in 0..4 {
            assert!((output[row * 3] - (input[row * 4] + 0.5)).abs() < DELTA);
            assert!((output[row * 3 + 1] - (input[row * 4 + 1] - 0.5)).abs() < DELTA);
            assert!((output[row * 3 + 2] - input[row * 4 + 2]).abs() < DELTA);
        }
    }

    #[test]
    fn test_dense_rejects_wrong_input_length() {
        let shape = shape();
        let params = DenseParameters {
            kernel: vec![0.0; 12],
            bias: vec![0.0; 3],
        };
        let dense = DenseKernel::new(&shape, &params).unwrap();
        let mut output = vec![0.0; 12];
        assert_eq!(
            dense.apply(&[0.0; 15], &mut output),
            Err(InferenceError::BufferSizeMismatch {
                buffer: "dense_input",
                expected: 16,
                actual: 15,
            })
        );
    }

    #[test]
    fn test_dense_rejects_wrong_bias_length() {
        let shape = shape();
        let params = DenseParameters {
            kernel: vec![0.0; 12],
            bias: vec![0.0; 4],
        };
        assert!(DenseKernel::new(&shape, &params).is_err());
    }

    #[test]
    fn test_dense_rejects_tile_not_dividing_batch() {
        // 4 rows in tiles of 3
        let shape = ModelShape::new(1, 1, 4, 1, 4, 3, 4, 1);
        let params = DenseParameters {
            kernel: vec![1.0; 4],
            bias: vec![0.5],
        };
        assert!(matches!(
            DenseKernel::new(&shape, &params),
            Err(InferenceError::TileDoesNotDivideBatch {
                batch_size: 4,
                tile_batch: 3,
            })
        ));
    }

    #[test]
    fn test_dense_rejects_zero_tile() {
        let shape = ModelShape::new(1, 1, 4, 1, 4, 0, 4, 1);
        let params = DenseParameters {
            kernel: vec![1.0; 4],
            bias: vec![0.5],
        };
        assert!(matches!(
            DenseKernel::new(&shape, &params),
            Err(InferenceError::InvalidShape { field: "tile_batch" })
        ));
    }
}
