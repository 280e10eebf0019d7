use log::info;

use crate::common::kd_exception::KdResult;
use crate::config::kd_config::KdConfig;
use crate::kline::daily_price::DailyPriceRecord;
use crate::math::kd::{compute_kd_with_policy, IndicatorResult, KdModel};

/// Validates price data per its config and runs the KD calculation.
#[derive(Debug, Clone)]
pub struct KdAnalyzer {
    config: KdConfig,
}

impl KdAnalyzer {
    pub fn new(config: KdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KdConfig {
        &self.config
    }

    /// Check (and, with autofix, repair) every record, sort them by date and
    /// compute one KD row per record.
    pub fn calculate(&self, records: &mut [DailyPriceRecord]) -> KdResult<Vec<IndicatorResult>> {
        if self.config.kl_data_check {
            for rec in records.iter_mut() {
                rec.check(self.config.autofix)?;
            }
        }

        let results = compute_kd_with_policy(
            records,
            self.config.kd_cycle,
            self.config.degenerate_policy,
        )?;

        if let (Some(first), Some(last)) = (results.first(), results.last()) {
            info!(
                "kd over {} days [{} .. {}], last k={:.2} d={:.2}",
                results.len(),
                first.date,
                last.date,
                last.k,
                last.d
            );
        }
        Ok(results)
    }

    /// Streaming model configured like this analyzer.
    pub fn model(&self) -> KdResult<KdModel> {
        KdModel::with_policy(self.config.kd_cycle, self.config.degenerate_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{enums::DegeneratePolicy, kd_exception::ErrCode, time::TradeDate};

    fn rec(key: u32, low: f64, high: f64, close: f64) -> DailyPriceRecord {
        DailyPriceRecord::new(TradeDate::from_yyyymmdd(key).unwrap(), close, high, low)
    }

    fn config(kl_data_check: bool, autofix: bool) -> KdConfig {
        KdConfig {
            kd_cycle: 2,
            degenerate_policy: DegeneratePolicy::Midpoint,
            kl_data_check,
            autofix,
        }
    }

    #[test]
    fn test_invalid_bar_rejected() {
        let mut records = vec![rec(20200101, 10.0, 20.0, 15.0), rec(20200102, 10.0, 20.0, 25.0)];
        let err = KdAnalyzer::new(config(true, false))
            .calculate(&mut records)
            .unwrap_err();
        assert_eq!(err.errcode, ErrCode::KlDataInvalid);
    }

    #[test]
    fn test_invalid_bar_autofixed() {
        let mut records = vec![rec(20200101, 10.0, 20.0, 15.0), rec(20200102, 10.0, 20.0, 25.0)];
        let out = KdAnalyzer::new(config(true, true))
            .calculate(&mut records)
            .unwrap();
        assert_eq!(records[1].high_price, 25.0);
        assert_eq!(out[1].window_high, 25.0);
        assert!((out[1].rsv - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_check_disabled() {
        let mut records = vec![rec(20200101, 10.0, 20.0, 15.0), rec(20200102, 10.0, 20.0, 25.0)];
        let out = KdAnalyzer::new(config(false, false))
            .calculate(&mut records)
            .unwrap();
        assert!((out[1].rsv - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_model_shares_config() {
        let analyzer = KdAnalyzer::new(config(true, false));
        let model = analyzer.model().unwrap();
        assert_eq!(model.period(), 2);
        assert_eq!(analyzer.config().degenerate_policy, DegeneratePolicy::Midpoint);
    }
}
