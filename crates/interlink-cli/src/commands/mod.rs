pub mod annotate;
pub mod check_config;
pub mod migrate;
