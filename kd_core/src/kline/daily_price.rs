use serde::{Deserialize, Serialize};

use crate::common::{
    kd_exception::{ErrCode, KdError},
    time::TradeDate,
};

/// One trading day of price data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPriceRecord {
    pub date: TradeDate,
    pub close_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl DailyPriceRecord {
    pub fn new(date: TradeDate, close_price: f64, high_price: f64, low_price: f64) -> Self {
        Self {
            date,
            close_price,
            high_price,
            low_price,
            open_price: None,
            volume: None,
        }
    }

    pub fn with_open(mut self, open_price: f64) -> Self {
        self.open_price = Some(open_price);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        [self.low_price, self.high_price, self.close_price]
            .into_iter()
            .chain(self.open_price)
    }

    /// Validate the bar; with `autofix`, widen low/high to cover open and close.
    pub fn check(&mut self, autofix: bool) -> Result<(), KdError> {
        if let Some(bad) = self.prices().find(|p| !p.is_finite()) {
            return Err(KdError::new(
                format!("{} has non-finite price {}", self.date, bad),
                ErrCode::KlDataInvalid,
            ));
        }
        if self.prices().any(|p| p < 0.0) {
            return Err(KdError::new(
                format!(
                    "{} has negative price [low={}, high={}, close={}]",
                    self.date, self.low_price, self.high_price, self.close_price
                ),
                ErrCode::PriceBelowZero,
            ));
        }

        let min_price = self.prices().fold(f64::INFINITY, f64::min);
        let max_price = self.prices().fold(f64::NEG_INFINITY, f64::max);

        if self.low_price > min_price {
            if autofix {
                self.low_price = min_price;
            } else {
                return Err(KdError::new(
                    format!(
                        "{} low price={} is not min of [low={}, high={}, close={}]",
                        self.date,
                        self.low_price,
                        self.low_price,
                        self.high_price,
                        self.close_price
                    ),
                    ErrCode::KlDataInvalid,
                ));
            }
        }

        if self.high_price < max_price {
            if autofix {
                self.high_price = max_price;
            } else {
                return Err(KdError::new(
                    format!(
                        "{} high price={} is not max of [low={}, high={}, close={}]",
                        self.date,
                        self.high_price,
                        self.low_price,
                        self.high_price,
                        self.close_price
                    ),
                    ErrCode::KlDataInvalid,
                ));
            }
        }
        Ok(())
    }
}
