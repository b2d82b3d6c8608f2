pub mod analysis;
pub mod config_error;
pub mod market_meta;
pub mod scan_error;
pub mod signal;
