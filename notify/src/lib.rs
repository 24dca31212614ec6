extern crate self as tonsub_notify;

pub mod error;
pub mod listener;
pub mod notification;
pub mod notifier;
