use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for the KD system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Parameter errors (0-99)
    #[strum(serialize = "_PARA_ERR_BEGIN")]
    ParaErrBegin = 0,
    #[strum(serialize = "COMMON_ERROR")]
    CommonError = 1,
    #[strum(serialize = "PARA_ERROR")]
    ParaError = 5,
    #[strum(serialize = "INVALID_WINDOW_SIZE")]
    InvalidWindowSize = 6,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 17,
    #[strum(serialize = "_PARA_ERR_END")]
    ParaErrEnd = 99,

    // Price data errors (200-299)
    #[strum(serialize = "_KL_ERR_BEGIN")]
    KlErrBegin = 200,
    #[strum(serialize = "PRICE_BELOW_ZERO")]
    PriceBelowZero = 201,
    #[strum(serialize = "KL_DATA_INVALID")]
    KlDataInvalid = 203,
    #[strum(serialize = "SRC_DATA_FORMAT_ERROR")]
    SrcDataFormatError = 204,
    #[strum(serialize = "EMPTY_WINDOW")]
    EmptyWindow = 205,
    #[strum(serialize = "DEGENERATE_RANGE")]
    DegenerateRange = 206,
    #[strum(serialize = "KL_NOT_MONOTONOUS")]
    KlNotMonotonous = 207,
    #[strum(serialize = "_KL_ERR_END")]
    KlErrEnd = 299,
}

impl ErrCode {
    pub fn is_kldata_err(&self) -> bool {
        let code = *self as i32;
        code > Self::KlErrBegin as i32 && code < Self::KlErrEnd as i32
    }

    pub fn is_para_err(&self) -> bool {
        let code = *self as i32;
        code > Self::ParaErrBegin as i32 && code < Self::ParaErrEnd as i32
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{errcode}: {msg}")]
pub struct KdError {
    pub errcode: ErrCode,
    pub msg: String,
}

impl KdError {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    pub fn is_kldata_err(&self) -> bool {
        self.errcode.is_kldata_err()
    }

    pub fn is_para_err(&self) -> bool {
        self.errcode.is_para_err()
    }
}

pub type KdResult<T> = Result<T, KdError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_error_display() {
        let err = KdError::new("window size must be >= 1, got 0", ErrCode::InvalidWindowSize);
        assert_eq!(
            err.to_string(),
            "INVALID_WINDOW_SIZE: window size must be >= 1, got 0"
        );
    }

    #[test]
    fn test_code_ranges() {
        assert!(ErrCode::InvalidWindowSize.is_para_err());
        assert!(!ErrCode::InvalidWindowSize.is_kldata_err());
        assert!(ErrCode::DegenerateRange.is_kldata_err());
        assert!(!ErrCode::KlErrBegin.is_kldata_err());
        assert!(!ErrCode::ParaErrEnd.is_para_err());
    }

    #[test]
    fn test_code_from_str() {
        assert_eq!(ErrCode::from_str("EMPTY_WINDOW").unwrap(), ErrCode::EmptyWindow);
        assert!(ErrCode::from_str("NOT_A_CODE").is_err());
    }
}
