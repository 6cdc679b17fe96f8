// File: ./src/calendar.rs
//! Projection of lessons onto concrete semester weeks.
//!
//! Odd/even-week lessons cannot be described by one weekly rule, so every
//! matching week is materialized as its own event whose validity window is
//! exactly that week (Monday to Sunday).
use crate::model::{ClockTime, Day, Lesson, Recurrence};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use icalendar::{Calendar, Component, Event};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEMESTER_WEEKS: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub start: NaiveDate,
    pub weeks: u32,
}

impl Semester {
    pub fn new(start: NaiveDate, weeks: u32) -> Self {
        Self { start, weeks }
    }

    /// Monday of the week containing the semester start.
    pub fn first_monday(&self) -> NaiveDate {
        self.start - Duration::days(self.start.weekday().num_days_from_monday() as i64)
    }

    pub fn week_monday(&self, offset: u32) -> NaiveDate {
        self.first_monday() + Duration::weeks(offset as i64)
    }
}

/// Calendar-week number: day of year (1-based) plus the weekday of January 1st
/// counted from Sunday, divided by seven and rounded up.
pub fn week_number(date: NaiveDate) -> u32 {
    let jan1_weekday = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.ordinal() + jan1_weekday).div_ceil(7)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub day: Day,
    /// 0 = Sunday .. 6 = Saturday, as calendar widgets expect.
    pub day_of_week: u32,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub recurrence: Recurrence,
    pub week_number: u32,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub room: String,
    pub instructor: String,
}

fn event_title(lesson: &Lesson) -> String {
    let name = if lesson.subject_name.is_empty() {
        &lesson.subject_code
    } else {
        &lesson.subject_name
    };
    format!("{} ({})", name, lesson.kind.code())
}

/// Expands lessons into one event per matching semester week.
/// Weekend lessons and block/unknown recurrences are not expanded.
pub fn project<'a, I>(lessons: I, semester: &Semester) -> Vec<CalendarEvent>
where
    I: IntoIterator<Item = &'a Lesson>,
{
    let mut events = Vec::new();

    for lesson in lessons {
        if lesson.day.is_weekend() {
            continue;
        }
        for offset in 0..semester.weeks {
            let monday = semester.week_monday(offset);
            let week = week_number(monday);
            if !lesson.recurrence.occurs_in_week(week) {
                continue;
            }
            let date = monday + Duration::days(lesson.day.index() as i64);
            events.push(CalendarEvent {
                title: event_title(lesson),
                day: lesson.day,
                day_of_week: lesson.day.to_weekday().num_days_from_sunday(),
                date,
                start: lesson.start(),
                end: lesson.end(),
                recurrence: lesson.recurrence.clone(),
                week_number: week,
                valid_from: monday,
                valid_until: monday + Duration::days(6),
                room: lesson.room.clone(),
                instructor: lesson.instructor.clone(),
            });
        }
    }
    log::debug!("Projected {} calendar events", events.len());
    events
}

// --- ICAL EXPORT ---

pub fn to_ics(events: &[CalendarEvent]) -> String {
    let mut calendar = Calendar::new();

    for ev in events {
        let mut event = Event::new();
        event.uid(&uuid::Uuid::new_v4().to_string());
        event.summary(&ev.title);
        event.timestamp(Utc::now());

        let starts = ev.start.on_date(ev.date);
        let ends = ev.end.on_date(ev.date);
        // Floating local times: lessons follow the wall clock of the school.
        event.add_property("DTSTART", starts.format("%Y%m%dT%H%M%S").to_string());
        event.add_property("DTEND", ends.format("%Y%m%dT%H%M%S").to_string());

        if !ev.room.is_empty() {
            event.add_property("LOCATION", &ev.room);
        }
        if !ev.instructor.is_empty() {
            event.description(&format!("{} · {}", ev.instructor, ev.recurrence.code()));
        }
        calendar.push(event);
    }
    calendar.to_string()
}
