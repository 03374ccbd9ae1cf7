pub mod commit;
pub mod interval;
pub mod outcome;
pub mod report;
pub mod session;
pub mod task;
