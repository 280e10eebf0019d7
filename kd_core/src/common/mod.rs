pub mod enums;
pub mod kd_exception;
pub mod time;
