use crate::common::kd_exception::{ErrCode, KdError};
use crate::kline::daily_price::DailyPriceRecord;

// `f64::min`/`f64::max` skip a NaN operand; a NaN price must poison the window.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Lowest low and highest high over a window of records.
///
/// Starts from the first record rather than from an infinite sentinel, so a
/// one-record window returns that record's own low and high.
pub fn scan_extrema(window: &[DailyPriceRecord]) -> Result<(f64, f64), KdError> {
    let (first, rest) = window
        .split_first()
        .ok_or_else(|| KdError::new("cannot scan an empty window", ErrCode::EmptyWindow))?;

    let extrema = rest
        .iter()
        .fold((first.low_price, first.high_price), |(low, high), rec| {
            (nan_min(low, rec.low_price), nan_max(high, rec.high_price))
        });
    Ok(extrema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::TradeDate;

    fn rec(key: u32, low: f64, high: f64) -> DailyPriceRecord {
        DailyPriceRecord::new(TradeDate::from_yyyymmdd(key).unwrap(), low, high, low)
    }

    #[test]
    fn test_single_record_window() {
        let window = [rec(20200102, 7.5, 9.25)];
        assert_eq!(scan_extrema(&window).unwrap(), (7.5, 9.25));
    }

    #[test]
    fn test_min_low_max_high() {
        let window = [
            rec(20200102, 10.0, 12.0),
            rec(20200103, 8.0, 11.0),
            rec(20200106, 9.0, 14.0),
        ];
        assert_eq!(scan_extrema(&window).unwrap(), (8.0, 14.0));
    }

    #[test]
    fn test_extrema_from_different_records() {
        // lowest low and highest high need not share a record
        let window = [rec(20200102, 1.0, 2.0), rec(20200103, 50.0, 60.0)];
        assert_eq!(scan_extrema(&window).unwrap(), (1.0, 60.0));
    }

    #[test]
    fn test_nan_price_poisons_window() {
        let window = [rec(20200102, f64::NAN, 12.0), rec(20200103, 10.0, 11.0)];
        let (low, high) = scan_extrema(&window).unwrap();
        assert!(low.is_nan());
        assert_eq!(high, 12.0);

        let window = [rec(20200102, 9.0, 12.0), rec(20200103, 10.0, f64::NAN)];
        let (low, high) = scan_extrema(&window).unwrap();
        assert_eq!(low, 9.0);
        assert!(high.is_nan());
    }

    #[test]
    fn test_empty_window() {
        let err = scan_extrema(&[]).unwrap_err();
        assert_eq!(err.errcode, ErrCode::EmptyWindow);
    }
}
