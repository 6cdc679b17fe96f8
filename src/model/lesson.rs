// File: ./src/model/lesson.rs
use crate::error::{Result, ScheduleError};
use crate::model::groups::{GroupRange, extract_groups};
use crate::model::time::ClockTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Number of semantic cells in one schedule row.
pub const ROW_CELLS: usize = 10;

// --- DAYS ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Day {
    #[serde(rename = "Po")]
    Monday,
    #[serde(rename = "Ut")]
    Tuesday,
    #[serde(rename = "St")]
    Wednesday,
    #[serde(rename = "Št")]
    Thursday,
    #[serde(rename = "Pi")]
    Friday,
    #[serde(rename = "So")]
    Saturday,
    #[serde(rename = "Ne")]
    Sunday,
}

impl Day {
    pub fn code(&self) -> &'static str {
        match self {
            Day::Monday => "Po",
            Day::Tuesday => "Ut",
            Day::Wednesday => "St",
            Day::Thursday => "Št",
            Day::Friday => "Pi",
            Day::Saturday => "So",
            Day::Sunday => "Ne",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Day::Monday => "Pondelok",
            Day::Tuesday => "Utorok",
            Day::Wednesday => "Streda",
            Day::Thursday => "Štvrtok",
            Day::Friday => "Piatok",
            Day::Saturday => "Sobota",
            Day::Sunday => "Nedeľa",
        }
    }

    /// Position in the fixed Monday..Sunday order, Monday = 0.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, Day::Saturday | Day::Sunday)
    }

    pub fn from_code(code: &str) -> Result<Self> {
        let code = code.trim();
        Day::iter()
            .find(|d| d.code() == code)
            .ok_or_else(|| ScheduleError::InvalidDay(code.to_string()))
    }

    pub fn to_weekday(&self) -> chrono::Weekday {
        match self {
            Day::Monday => chrono::Weekday::Mon,
            Day::Tuesday => chrono::Weekday::Tue,
            Day::Wednesday => chrono::Weekday::Wed,
            Day::Thursday => chrono::Weekday::Thu,
            Day::Friday => chrono::Weekday::Fri,
            Day::Saturday => chrono::Weekday::Sat,
            Day::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl FromStr for Day {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

// --- KIND & RECURRENCE ---

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonKind {
    /// `P`
    Lecture,
    /// `S`
    Seminar,
    /// `C`
    Practical,
    /// Any other code, kept verbatim.
    Other(String),
}

impl LessonKind {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "P" => LessonKind::Lecture,
            "S" => LessonKind::Seminar,
            "C" => LessonKind::Practical,
            other => LessonKind::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            LessonKind::Lecture => "P",
            LessonKind::Seminar => "S",
            LessonKind::Practical => "C",
            LessonKind::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LessonKind::Lecture => "Prednáška",
            LessonKind::Seminar => "Seminár",
            LessonKind::Practical => "Cvičenie",
            LessonKind::Other(code) => code,
        }
    }

    pub fn is_lecture(&self) -> bool {
        matches!(self, LessonKind::Lecture)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recurrence {
    /// `TYZ`
    Weekly,
    /// `N.T`
    OddWeeks,
    /// `P.T`
    EvenWeeks,
    /// `BLK`
    Block,
    Other(String),
}

impl Recurrence {
    /// An empty cell is read as weekly.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "" | "TYZ" => Recurrence::Weekly,
            "N.T" => Recurrence::OddWeeks,
            "P.T" => Recurrence::EvenWeeks,
            "BLK" => Recurrence::Block,
            other => Recurrence::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Recurrence::Weekly => "TYZ",
            Recurrence::OddWeeks => "N.T",
            Recurrence::EvenWeeks => "P.T",
            Recurrence::Block => "BLK",
            Recurrence::Other(code) => code,
        }
    }

    /// Whether the lesson takes place in a week with the given calendar-week number.
    pub fn occurs_in_week(&self, week_number: u32) -> bool {
        match self {
            Recurrence::Weekly => true,
            Recurrence::OddWeeks => week_number % 2 == 1,
            Recurrence::EvenWeeks => week_number % 2 == 0,
            Recurrence::Block | Recurrence::Other(_) => false,
        }
    }
}

// --- TIME RANGE ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: Option<ClockTime>,
}

impl TimeRange {
    /// `HH:MM` or `HH:MM-HH:MM`, no inner whitespace.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        let invalid = || ScheduleError::InvalidTimeFormat(s.to_string());
        let strict = |part: &str| -> Result<ClockTime> {
            if part.len() != part.trim().len() {
                return Err(invalid());
            }
            ClockTime::parse(part).map_err(|_| invalid())
        };

        match s.split_once('-') {
            Some((start, end)) => Ok(Self {
                start: strict(start)?,
                end: Some(strict(end)?),
            }),
            None => Ok(Self {
                start: strict(s)?,
                end: None,
            }),
        }
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    /// Explicit end, or one academic block after the start.
    pub fn end(&self) -> ClockTime {
        self.end.unwrap_or_else(|| self.start.end_of_block())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}", self.start),
        }
    }
}

// --- LESSON ---

/// One scheduled block, built from one table row. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub day: Day,
    pub time: TimeRange,
    pub hours: u32,
    pub kind: LessonKind,
    pub subject_code: String,
    pub subject_name: String,
    pub room: String,
    pub instructor: String,
    pub note: String,
    pub recurrence: Recurrence,
    groups: Vec<u8>,
}

impl Lesson {
    /// Builds a lesson from the ten data cells of a row, in column order:
    /// day, time, hours, kind, code, name, room, instructor, note, recurrence.
    pub fn from_cells<S: AsRef<str>>(cells: &[S], range: GroupRange) -> Result<Self> {
        if cells.len() < ROW_CELLS {
            return Err(ScheduleError::MissingCells {
                found: cells.len(),
                expected: ROW_CELLS,
            });
        }
        let cell = |i: usize| cells[i].as_ref().trim();

        let day = Day::from_code(cell(0))?;
        let time = TimeRange::parse(cell(1))?;
        let hours = cell(2).parse::<u32>().unwrap_or(0);
        let note = cell(8).to_string();
        let groups = extract_groups(&note, range);

        Ok(Self {
            day,
            time,
            hours,
            kind: LessonKind::from_code(cell(3)),
            subject_code: cell(4).to_string(),
            subject_name: cell(5).to_string(),
            room: cell(6).to_string(),
            instructor: cell(7).to_string(),
            note,
            recurrence: Recurrence::from_code(cell(9)),
            groups,
        })
    }

    /// Groups this lesson is restricted to. Empty means every group.
    pub fn groups(&self) -> &[u8] {
        &self.groups
    }

    pub fn applies_to(&self, group: Option<u8>) -> bool {
        match group {
            None => true,
            Some(g) => self.groups.is_empty() || self.groups.contains(&g),
        }
    }

    pub fn start(&self) -> ClockTime {
        self.time.start()
    }

    pub fn end(&self) -> ClockTime {
        self.time.end()
    }

    pub fn duration_minutes(&self) -> i32 {
        self.start().minutes_until(&self.end())
    }

    pub fn groups_label(&self) -> String {
        if self.groups.is_empty() {
            "Všetky".to_string()
        } else {
            self.groups
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: &str, time: &str, hours: &str, note: &str) -> Vec<String> {
        [day, time, hours, "C", "MAT1", "Matematika", "A-101", "Novák", note, "TYZ"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_from_cells_trims_and_parses() {
        let cells = [
            " Po ", " 08:45-10:15 ", " 2 ", " P ", " MAT1 ", " Matematika ", " A-101 ", " Novák ",
            " 2. skupina ", " N.T ",
        ];
        let l = Lesson::from_cells(&cells, GroupRange::default()).unwrap();
        assert_eq!(l.day, Day::Monday);
        assert_eq!(l.time.to_string(), "08:45-10:15");
        assert_eq!(l.hours, 2);
        assert_eq!(l.kind, LessonKind::Lecture);
        assert_eq!(l.subject_name, "Matematika");
        assert_eq!(l.note, "2. skupina");
        assert_eq!(l.recurrence, Recurrence::OddWeeks);
        assert_eq!(l.groups(), &[2]);
    }

    #[test]
    fn test_invalid_day() {
        let err = Lesson::from_cells(&row("XX", "08:00", "2", ""), GroupRange::default());
        assert_eq!(err, Err(ScheduleError::InvalidDay("XX".to_string())));
    }

    #[test]
    fn test_invalid_time_format() {
        for bad in ["", "8h", "08:00-", "08:00 - 09:30", "08:00-25:00", "08:00-09:30-10:00"] {
            let err = Lesson::from_cells(&row("Ut", bad, "2", ""), GroupRange::default());
            assert!(
                matches!(err, Err(ScheduleError::InvalidTimeFormat(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_lesson_running_until_midnight() {
        let l = Lesson::from_cells(&row("Pi", "22:30-24:00", "2", ""), GroupRange::default())
            .unwrap();
        assert_eq!(l.end(), ClockTime::END_OF_DAY);
        assert_eq!(l.duration_minutes(), 90);
        assert_eq!(l.time.to_string(), "22:30-24:00");

        let err = Lesson::from_cells(&row("Pi", "22:30-24:30", "2", ""), GroupRange::default());
        assert!(matches!(err, Err(ScheduleError::InvalidTimeFormat(_))));
    }

    #[test]
    fn test_hours_default_to_zero() {
        let l = Lesson::from_cells(&row("St", "09:00", "dve", ""), GroupRange::default()).unwrap();
        assert_eq!(l.hours, 0);
    }

    #[test]
    fn test_missing_cells() {
        let cells = ["Po", "08:00"];
        assert_eq!(
            Lesson::from_cells(&cells, GroupRange::default()),
            Err(ScheduleError::MissingCells {
                found: 2,
                expected: ROW_CELLS
            })
        );
    }

    #[test]
    fn test_end_defaults_to_one_block() {
        let l = Lesson::from_cells(&row("Pi", "08:45", "2", ""), GroupRange::default()).unwrap();
        assert_eq!(l.end().to_string(), "10:15");
        assert_eq!(l.duration_minutes(), 90);
    }

    #[test]
    fn test_applies_to() {
        let all = Lesson::from_cells(&row("Po", "08:00", "2", ""), GroupRange::default()).unwrap();
        assert!(all.applies_to(None));
        assert!(all.applies_to(Some(3)));

        let second =
            Lesson::from_cells(&row("Po", "08:00", "2", "2. skupina"), GroupRange::default())
                .unwrap();
        assert!(second.applies_to(None));
        assert!(second.applies_to(Some(2)));
        assert!(!second.applies_to(Some(5)));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Day::from_code("Št").unwrap(), Day::Thursday);
        assert_eq!(Day::iter().map(|d| d.index()).collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
        assert_eq!(LessonKind::from_code("X"), LessonKind::Other("X".to_string()));
        assert_eq!(Recurrence::from_code(""), Recurrence::Weekly);
        assert_eq!(Recurrence::from_code("BLK"), Recurrence::Block);
    }
}
