//! Recurrent-state kernel of a simple RNN.
//!
//! Computes one time step `output = last_state · recurrent_kernel +
//! input_state · kernel + bias` for a full batch. The activation is not part of
//! the kernel; the driver applies tanh to the output before it becomes the next
//! `last_state`.
//!
//! For each output index `k` the two products `input_state[row] * kernel[:, k]`
//! and `last_state[row] * recurrent_kernel[:, k]` are laid out back to back in one
//! work vector of width `rnn_input_size + rnn_state_size` and reduced with a
//! single tree. That width is generally not a power of two, which is why the
//! tree carries unpaired elements forward.

use crate::buffers::{TileBuffer, load_column};
use crate::errors::InferenceResult;
use crate::model_parameters::{RecurrentParameters, check_len};
use crate::reduction::tree_reduce;
use crate::shape::ModelShape;

pub struct RecurrentKernel<'a> {
    shape: &'a ModelShape,
    params: &'a RecurrentParameters,
}

impl<'a> RecurrentKernel<'a> {
    /// Creates the kernel after validating the shape and checking the parameters against it.
    pub fn new(shape: &'a ModelShape, params: &'a RecurrentParameters) -> InferenceResult<Self> {
        shape.validate()?;
        check_len("rnn_kernel", shape.rnn_kernel_len(), params.kernel.len())?;
        check_len(
            "rnn_recurrent_kernel",
            shape.rnn_recurrent_kernel_len(),
            params.recurrent_kernel.len(),
        )?;
        check_len("rnn_bias", shape.rnn_state_size, params.bias.len())?;
        Ok(Self { shape, params })
    }

    /// Computes the pre-activation state of every batch row.
    ///
    /// `last_state` and `output_state` are `rnn_batch_size × rnn_state_size`,
    /// `input_state` is `rnn_batch_size × rnn_input_size`.
    pub fn apply(
        &self,
        last_state: &[f32],
        input_state: &[f32],
        output_state: &mut [f32],
    ) -> InferenceResult<()> {
        let shape = self.shape;
        check_len("last_state", shape.state_len(), last_state.len())?;
        check_len("input_state", shape.input_state_len(), input_state.len())?;
        check_len("output_state", shape.state_len(), output_state.len())?;

        let tile_batch = shape.tile_batch;
        let mut input_tile = TileBuffer::new(tile_batch, shape.rnn_input_size);
        let mut last_tile = TileBuffer::new(tile_batch, shape.rnn_state_size);
        let mut output_tile = TileBuffer::new(tile_batch, shape.rnn_state_size);

        for tile_index in 0..shape.rnn_batch_size / tile_batch {
            let start_row = tile_index * tile_batch;
            input_tile.load_rows(input_state, start_row);
            last_tile.load_rows(last_state, start_row);

            self.load_kernels_and_compute(&input_tile, &last_tile, &mut output_tile);

            self.save_tile(&output_tile, output_state, start_row);
        }

        Ok(())
    }

    /// Streams the weight columns one output index at a time and fills
    /// `output_tile` with the reduced sums, without bias.
    fn load_kernels_and_compute(
        &self,
        input_tile: &TileBuffer,
        last_tile: &TileBuffer,
        output_tile: &mut TileBuffer,
    ) {
        let shape = self.shape;
        let mut kernel_column = vec![0.0f32; shape.rnn_input_size];
        let mut recurrent_column = vec![0.0f32; shape.rnn_state_size];
        let mut work = TileBuffer::new(input_tile.rows(), shape.recurrent_reduction_width());

        for state_index in 0..shape.rnn_state_size {
            load_column(
                &self.params.kernel,
                shape.rnn_state_size,
                state_index,
                &mut kernel_column,
            );
            load_column(
                &self.params.recurrent_kernel,
                shape.rnn_state_size,
                state_index,
                &mut recurrent_column,
            );

            Self::compute(
                input_tile,
                last_tile,
                &kernel_column,
                &recurrent_column,
                &mut work,
                output_tile,
                state_index,
            );
        }
    }

    #[inline(always)]
    fn compute(
        input_tile: &TileBuffer,
        last_tile: &TileBuffer,
        kernel_column: &[f32],
        recurrent_column: &[f32],
        work: &mut TileBuffer,
        output_tile: &mut TileBuffer,
        state_index: usize,
    ) {
        let input_size = kernel_column.len();

        for row in 0..input_tile.rows() {
            let work_row = work.row_mut(row);
            let (input_part, state_part) = work_row.split_at_mut(input_size);

            for ((product, &weight), &value) in input_part
                .iter_mut()
                .zip(kernel_column.iter())
                .zip(input_tile.row(row).iter())
            {
                *product = weight * value;
            }
            for ((product, &weight), &value) in state_part
                .iter_mut()
                .zip(recurrent_column.iter())
                .zip(last_tile.row(row).iter())
            {
                *product = weight * value;
            }

            output_tile.row_mut(row)[state_index] = tree_reduce(work_row);
        }
    }

    /// Adds the bias and writes the tile to the state rows starting at `start_row`.
    #[inline(always)]
    fn save_tile(&self, output_tile: &TileBuffer, output_state: &mut [f32], start_row: usize) {
        let width = self.shape.rnn_state_size;
        for row in 0..output_tile.rows() {
            let start = (start_row + row) * width;
            for ((out, &bias), &reduced) in output_state[start..start + width]
                .iter_mut()
                .zip(self.params.bias.iter())
                .zip(output_tile.row(row).iter())
            {
                *out = bias + reduced;
            }
        }
    }
}
