pub mod extrema;
pub mod kd;
