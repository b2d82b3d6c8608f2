pub mod error;

pub mod instruments;
pub mod identifiers;
pub mod timeframe;

pub mod deserialization;
pub mod bar;
pub mod series;
