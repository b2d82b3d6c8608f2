pub mod exchange;
pub mod notify;
pub mod protocol;
