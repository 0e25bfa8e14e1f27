#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod history;
pub mod model;
pub mod reconcile;
pub mod review;
pub mod scoring;
pub mod time;

pub use error::Error;
pub use time::Clock;
