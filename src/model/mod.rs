// File: ./src/model/mod.rs
pub mod groups;
pub mod lesson;
pub mod time;

pub use groups::{GroupRange, extract_groups};
pub use lesson::{Day, Lesson, LessonKind, ROW_CELLS, Recurrence, TimeRange};
pub use time::{BLOCK_MINUTES, ClockTime, format_duration};
