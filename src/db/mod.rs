pub mod annotations;
pub mod commits;
pub mod initialize;
pub mod intervals;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod sessions;
pub mod stats;
pub mod tasks;
