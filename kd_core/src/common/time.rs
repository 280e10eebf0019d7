use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::kd_exception::{ErrCode, KdError};

/// Trading day used as the ordering key of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeDate(NaiveDate);

impl TradeDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, KdError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                KdError::new(
                    format!("invalid date {:04}-{:02}-{:02}", year, month, day),
                    ErrCode::SrcDataFormatError,
                )
            })
    }

    /// Build from an integer key such as `20200102`.
    pub fn from_yyyymmdd(key: u32) -> Result<Self, KdError> {
        Self::from_ymd((key / 10000) as i32, key / 100 % 100, key % 100)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn to_yyyymmdd(&self) -> u32 {
        self.0.year() as u32 * 10000 + self.0.month() * 100 + self.0.day()
    }

    pub fn to_date_str(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

impl FromStr for TradeDate {
    type Err = KdError;

    /// Supports "YYYY-MM-DD", "YYYY-MM-DD HH:MM:SS" or "YYYYMMDD"
    fn from_str(time_str: &str) -> Result<Self, Self::Err> {
        let s = time_str.trim();
        let parsed = if s.contains(' ') {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        } else if s.contains('-') {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
        } else {
            NaiveDate::parse_from_str(s, "%Y%m%d")
        };

        parsed.map(Self).map_err(|e| {
            KdError::new(
                format!("cannot parse date {:?}: {}", time_str, e),
                ErrCode::SrcDataFormatError,
            )
        })
    }
}

impl From<NaiveDate> for TradeDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
