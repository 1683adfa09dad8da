//! Default shape constants of the sentiment classifier the kernels were sized for.
//!
//! The recurrent input and state widths concatenate to 228, which is the width
//! the carry-forward reduction tree is laid out for.

/// Vocabulary size of the embedding table.
pub const WORD_NUM: usize = 10_000;
/// Width of one embedding vector.
pub const WORD_SIZE: usize = 100;

pub const RNN_INPUT_SIZE: usize = WORD_SIZE;
pub const RNN_STATE_SIZE: usize = 128;
pub const RNN_BATCH_SIZE: usize = 64;

pub const FC_INPUT_SIZE: usize = RNN_STATE_SIZE;
pub const FC_OUTPUT_SIZE: usize = 2;
pub const FC_BATCH_SIZE: usize = RNN_BATCH_SIZE;

pub const SM_BATCH_SIZE: usize = FC_BATCH_SIZE;
pub const SM_CLASS_SIZE: usize = FC_OUTPUT_SIZE;

/// Number of batch rows processed together by one kernel tile.
pub const TILE_BATCH: usize = 32;

/// Number of sequences in the evaluation dataset.
pub const SAMPLE_NUM: usize = 1000;
/// Number of tokens in every sequence.
pub const SAMPLE_LEN: usize = 50;
