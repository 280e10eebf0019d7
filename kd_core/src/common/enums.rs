use strum_macros::{Display, EnumString};

/// Which branch of the recurrence produces a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// Fewer than `n` records seen; k and d are seeded.
    Warmup,
    /// A full window ends at this row.
    Steady,
}

impl Phase {
    /// Phase of the row at `index` for window size `n` (`n >= 1`).
    pub fn of(index: usize, n: usize) -> Self {
        if is_warmup(index, n) {
            Phase::Warmup
        } else {
            Phase::Steady
        }
    }
}

/// `index < n - 1`, written without underflow for `n == 0`.
pub fn is_warmup(index: usize, n: usize) -> bool {
    index + 1 < n
}

/// How rsv is derived when a window's high equals its low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum DegeneratePolicy {
    /// Divide anyway; the non-finite value flows into every later k and d.
    #[default]
    #[strum(serialize = "propagate")]
    Propagate,
    /// Use rsv = 50.
    #[strum(serialize = "midpoint")]
    Midpoint,
    /// Use rsv = previous k, so k carries forward unchanged.
    #[strum(serialize = "hold")]
    Hold,
    /// Fail with `ErrCode::DegenerateRange`.
    #[strum(serialize = "reject")]
    Reject,
}
