//! Tiled streaming kernels.
//!
//! Both kernels share one discipline: the batch is processed in tiles of
//! `tile_batch` rows, the tile rows are loaded into a local [`TileBuffer`], one
//! weight column at a time is gathered into a local vector, and every
//! per-row product vector is collapsed with [`tree_reduce`] instead of a running
//! accumulator. Scratch buffers live only for one kernel invocation.
//!
//! [`TileBuffer`]: crate::buffers::TileBuffer
//! [`tree_reduce`]: crate::reduction::tree_reduce

pub mod dense_kernel;
pub mod recurrent_kernel;

pub use dense_kernel::DenseKernel;
pub use recurrent_kernel::RecurrentKernel;
