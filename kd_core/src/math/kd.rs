use std::collections::VecDeque;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::common::{
    enums::{DegeneratePolicy, Phase},
    kd_exception::{ErrCode, KdError, KdResult},
    time::TradeDate,
};
use crate::kline::daily_price::DailyPriceRecord;
use crate::math::extrema::scan_extrema;

/// Value of k and d before the first full window.
pub const SEED_VALUE: f64 = 50.0;

const ONE_THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// One row of KD output.
///
/// Warm-up rows keep `window_high`, `window_low` and `rsv` at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub date: TradeDate,
    pub close_price: f64,
    pub window_high: f64,
    pub window_low: f64,
    pub rsv: f64,
    pub k: f64,
    pub d: f64,
}

impl IndicatorResult {
    fn seed(rec: &DailyPriceRecord) -> Self {
        Self {
            date: rec.date,
            close_price: rec.close_price,
            window_high: 0.0,
            window_low: 0.0,
            rsv: 0.0,
            k: SEED_VALUE,
            d: SEED_VALUE,
        }
    }

    /// J line of the KDJ family, `3k - 2d`.
    pub fn j(&self) -> f64 {
        3.0 * self.k - 2.0 * self.d
    }
}

pub(crate) fn check_window_size(n: usize) -> KdResult<()> {
    if n == 0 {
        return Err(KdError::new(
            "window size must be >= 1, got 0",
            ErrCode::InvalidWindowSize,
        ));
    }
    Ok(())
}

fn resolve_rsv(
    rec: &DailyPriceRecord,
    low: f64,
    high: f64,
    prev_k: f64,
    policy: DegeneratePolicy,
) -> KdResult<f64> {
    let rsv = 100.0 * (rec.close_price - low) / (high - low);
    if high != low {
        return Ok(rsv);
    }

    warn!(
        "{}: flat window (high == low == {}), degenerate policy {}",
        rec.date, high, policy
    );
    match policy {
        DegeneratePolicy::Propagate => Ok(rsv),
        DegeneratePolicy::Midpoint => Ok(SEED_VALUE),
        DegeneratePolicy::Hold => Ok(prev_k),
        DegeneratePolicy::Reject => Err(KdError::new(
            format!("{} window high equals window low ({})", rec.date, high),
            ErrCode::DegenerateRange,
        )),
    }
}

/// Row for the last record of `window`, smoothed against `prev`.
///
/// With no previous row the seed values stand in for it.
fn steady_row(
    window: &[DailyPriceRecord],
    prev: Option<&IndicatorResult>,
    policy: DegeneratePolicy,
) -> KdResult<IndicatorResult> {
    let (low, high) = scan_extrema(window)?;
    let rec = &window[window.len() - 1];
    let (prev_k, prev_d) = prev.map_or((SEED_VALUE, SEED_VALUE), |p| (p.k, p.d));

    let rsv = resolve_rsv(rec, low, high, prev_k, policy)?;
    let k = ONE_THIRD * rsv + TWO_THIRDS * prev_k;
    let d = ONE_THIRD * k + TWO_THIRDS * prev_d;

    Ok(IndicatorResult {
        date: rec.date,
        close_price: rec.close_price,
        window_high: high,
        window_low: low,
        rsv,
        k,
        d,
    })
}

/// Compute KD over `records` with window `n`, propagating non-finite values
/// from flat windows.
///
/// `records` is sorted by date in place first; equal dates keep input order.
pub fn compute_kd(
    records: &mut [DailyPriceRecord],
    n: usize,
) -> KdResult<Vec<IndicatorResult>> {
    compute_kd_with_policy(records, n, DegeneratePolicy::Propagate)
}

pub fn compute_kd_with_policy(
    records: &mut [DailyPriceRecord],
    n: usize,
    policy: DegeneratePolicy,
) -> KdResult<Vec<IndicatorResult>> {
    check_window_size(n)?;
    records.sort_by(|a, b| a.date.cmp(&b.date));

    let mut results: Vec<IndicatorResult> = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let row = match Phase::of(i, n) {
            Phase::Warmup => IndicatorResult::seed(rec),
            Phase::Steady => steady_row(&records[i + 1 - n..=i], results.last(), policy)?,
        };
        results.push(row);
    }

    debug!(
        "computed {} kd rows (window={}, warmup={}, policy={})",
        results.len(),
        n,
        results.len().min(n - 1),
        policy
    );
    Ok(results)
}

/// Incremental KD over records pushed in date order.
///
/// Produces the same rows as [`compute_kd_with_policy`] on the same sorted
/// series, keeping only the last `period` records.
#[derive(Debug, Clone)]
pub struct KdModel {
    period: usize,
    policy: DegeneratePolicy,
    window: VecDeque<DailyPriceRecord>,
    last: Option<IndicatorResult>,
    count: usize,
}

impl KdModel {
    pub fn new(period: usize) -> KdResult<Self> {
        Self::with_policy(period, DegeneratePolicy::default())
    }

    pub fn with_policy(period: usize, policy: DegeneratePolicy) -> KdResult<Self> {
        check_window_size(period)?;
        Ok(Self {
            period,
            policy,
            window: VecDeque::with_capacity(period + 1),
            last: None,
            count: 0,
        })
    }

    pub fn add(&mut self, rec: DailyPriceRecord) -> KdResult<IndicatorResult> {
        if let Some(last) = &self.last {
            if rec.date < last.date {
                return Err(KdError::new(
                    format!("{} pushed after {}", rec.date, last.date),
                    ErrCode::KlNotMonotonous,
                ));
            }
        }

        self.window.push_back(rec);
        let evicted = if self.window.len() > self.period {
            self.window.pop_front()
        } else {
            None
        };

        let row = match Phase::of(self.count, self.period) {
            Phase::Warmup => Ok(IndicatorResult::seed(&self.window[self.window.len() - 1])),
            Phase::Steady => steady_row(
                self.window.make_contiguous(),
                self.last.as_ref(),
                self.policy,
            ),
        };

        match row {
            Ok(row) => {
                self.count += 1;
                self.last = Some(row.clone());
                Ok(row)
            }
            Err(e) => {
                // roll the window back so a failed add leaves the model untouched
                self.window.pop_back();
                if let Some(front) = evicted {
                    self.window.push_front(front);
                }
                Err(e)
            }
        }
    }

    pub fn last(&self) -> Option<&IndicatorResult> {
        self.last.as_ref()
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.last = None;
        self.count = 0;
    }
}
