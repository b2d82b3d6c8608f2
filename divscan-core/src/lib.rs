pub mod config;
pub mod model;

pub mod oscillator;
pub mod cluster;
pub mod strategy;

pub mod data;
pub mod notify;
pub mod scanner;
