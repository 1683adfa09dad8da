//! Scratch buffers used by the kernels and the driver.
//!
//! A [`TileBuffer`] is the software stand-in for the fast local registers of one
//! kernel tile: a rectangular `rows × cols` block that is allocated when a kernel
//! invocation starts and dropped when it returns. A [`StatePair`] holds the two
//! recurrent state buffers that alternate roles between time steps.

/// Rectangular, row-major scratch block of `rows × cols` floats.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBuffer {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl TileBuffer {
    /// Allocates a zeroed buffer.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0f32; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    #[inline(always)]
    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Copies `rows` consecutive rows of width `cols` from a flat row-major
    /// source, starting at source row `start_row`.
    ///
    /// The caller guarantees the source holds at least `start_row + rows` rows.
    pub fn load_rows(&mut self, source: &[f32], start_row: usize) {
        let start = start_row * self.cols;
        self.data
            .copy_from_slice(&source[start..start + self.rows * self.cols]);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Gathers column `col` of a row-major `[rows][cols]` matrix into `column`.
///
/// `column.len()` is the number of rows gathered.
#[inline(always)]
pub fn load_column(matrix: &[f32], cols: usize, col: usize, column: &mut [f32]) {
    for (row, value) in column.iter_mut().enumerate() {
        *value = matrix[row * cols + col];
    }
}

/// Double buffer for the recurrent state.
///
/// At any instant `current` holds the live state and `next` is scratch that the
/// recurrent kernel writes into. [`swap`](Self::swap) exchanges the two owned
/// vectors without copying their contents.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePair {
    current: Vec<f32>,
    next: Vec<f32>,
}

impl StatePair {
    pub fn new(len: usize) -> Self {
        Self {
            current: vec![0.0f32; len],
            next: vec![0.0f32; len],
        }
    }

    /// Zeroes the live state, the initial state of every sample batch.
    pub fn reset(&mut self) {
        self.current.fill(0.0);
    }

    pub fn current(&self) -> &[f32] {
        &self.current
    }

    pub fn next_mut(&mut self) -> &mut [f32] {
        &mut self.next
    }

    /// Borrows the live state for reading and the scratch state for writing.
    pub fn split(&mut self) -> (&[f32], &mut [f32]) {
        (&self.current, &mut self.next)
    }

    /// Makes the freshly written scratch state the live state.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_buffer_rows() {
        let mut tile = TileBuffer::new(2, 3);
        tile.row_mut(1).copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(tile.row(0), &[0.0, 0.0, 0.0]);
        assert_eq!(tile.row(1), &[1.0, 2.0, 3.0]);
        assert_eq!(tile.as_slice().len(), 6);
    }

    #[test]
    fn test_tile_buffer_load_rows_from_offset() {
        let source: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let mut tile = TileBuffer::new(2, 3);
        tile.load_rows(&source, 2);
        assert_eq!(tile.row(0), &[6.0, 7.0, 8.0]);
        assert_eq!(tile.row(1), &[9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_load_column() {
        // 3 x 2 matrix
        let matrix = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut column = [0.0f32; 3];
        load_column(&matrix, 2, 1, &mut column);
        assert_eq!(column, [2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_state_pair_swap_exchanges_roles() {
        let mut pair = StatePair::new(2);
        pair.next_mut().copy_from_slice(&[1.0, 2.0]);
        pair.swap();
        assert_eq!(pair.current(), &[1.0, 2.0]);

        let (current, next) = pair.split();
        assert_eq!(current, &[1.0, 2.0]);
        assert_eq!(next, &[0.0, 0.0]);
    }

    #[test]
    fn test_state_pair_reset_zeroes_current() {
        let mut pair = StatePair::new(3);
        pair.next_mut().fill(5.0);
        pair.swap();
        pair.reset();
        assert_eq!(pair.current(), &[0.0, 0.0, 0.0]);
        assert_eq!(pair.len(), 3);
    }
}
