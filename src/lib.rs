// Crate root library declaration and module exports.
pub mod calendar;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod html;
pub mod loader;
pub mod manifest;
pub mod model;
pub mod report;
pub mod schedule;
pub mod state;

pub use error::{Result, ScheduleError};
pub use schedule::Schedule;
