pub mod analyzer;
pub mod common;
pub mod config;
pub mod kline;
pub mod math;

pub use analyzer::analyzer::KdAnalyzer;
pub use common::enums::DegeneratePolicy;
pub use common::kd_exception::{ErrCode, KdError, KdResult};
pub use common::time::TradeDate;
pub use config::kd_config::KdConfig;
pub use kline::daily_price::DailyPriceRecord;
pub use math::extrema::scan_extrema;
pub use math::kd::{compute_kd, compute_kd_with_policy, IndicatorResult, KdModel};
