pub mod kd_config;
