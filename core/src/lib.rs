extern crate self as tonsub_core;

pub mod log;
pub mod task;
pub mod time;
pub mod triggers;
