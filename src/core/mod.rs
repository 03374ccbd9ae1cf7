pub mod config;
pub mod durations;
pub mod hook;
pub mod log;
pub mod report;
pub mod session;
pub mod stats;
pub mod sync;
