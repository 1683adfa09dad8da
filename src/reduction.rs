//! Binary reduction tree with carry-forward for odd widths.
//!
//! The kernels never accumulate a dot product left to right. Each product
//! vector is folded in place: at width `W` the upper `W / 2` elements are added
//! onto the lower `W / 2`, and when `W` is odd the unpaired last element is
//! copied to slot `W / 2` so it joins the next round untouched. The next width is
//! therefore `W / 2 + W % 2`. For the default recurrent width this gives
//! `228 → 114 → 57 → 29 → 15 → 8 → 4 → 2 → 1`.
//!
//! The order of additions is fixed by the width alone, so results are
//! reproducible bit for bit across runs, tiles and threads.

/// Returns the width of the round following a round of width `width`.
#[inline(always)]
pub fn next_width(width: usize) -> usize {
    width / 2 + width % 2
}

/// Folds `values` in place and returns the reduced sum.
///
/// The contents of `values` are clobbered. An empty slice reduces to `0.0`.
#[inline(always)]
pub fn tree_reduce(values: &mut [f32]) -> f32 {
    let mut width = values.len();
    if width == 0 {
        return 0.0;
    }

    while width > 1 {
        let half = width / 2;
        for i in 0..half {
            values[i] += values[half + i];
        }
        if width % 2 == 1 {
            // slot `half` was already consumed as a partner above
            values[half] = values[width - 1];
        }
        width = half + width % 2;
    }

    values[0]
}

/// Widths visited by [`tree_reduce`] for an input of `width` elements, including
/// the starting width and the final width of 1.
pub fn reduction_schedule(width: usize) -> Vec<usize> {
    let mut schedule = Vec::new();
    if width == 0 {
        return schedule;
    }
    let mut current = width;
    schedule.push(current);
    while current > 1 {
        current = next_width(current);
        schedule.push(current);
    }
    schedule
}
