// File: ./src/state.rs
// Immutable view state threaded through rendering instead of globals.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Table, breaks, extremes and elective days together.
    #[default]
    Summary,
    Table,
    Breaks,
    Extremes,
    Electives,
    Stats,
    Calendar,
    Ics,
}

impl ViewMode {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Summary => "summary",
            ViewMode::Table => "table",
            ViewMode::Breaks => "breaks",
            ViewMode::Extremes => "extremes",
            ViewMode::Electives => "electives",
            ViewMode::Stats => "stats",
            ViewMode::Calendar => "calendar",
            ViewMode::Ics => "ics",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use strum::IntoEnumIterator;
        ViewMode::iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown view '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub group: Option<u8>,
    pub view: ViewMode,
}

impl AppState {
    pub fn new(group: Option<u8>, view: ViewMode) -> Self {
        Self { group, view }
    }

    /// Reads a group selector the way the `?s=` query parameter works:
    /// absent, empty, `0` or unparsable all mean "every group".
    pub fn parse_group(raw: Option<&str>) -> Option<u8> {
        match raw.map(str::trim) {
            None | Some("") | Some("0") => None,
            Some(s) => s.parse::<u8>().ok().filter(|g| *g > 0),
        }
    }

    pub fn from_query(raw_group: Option<&str>, view: ViewMode) -> Self {
        Self::new(Self::parse_group(raw_group), view)
    }

    pub fn with_group(self, group: Option<u8>) -> Self {
        Self { group, ..self }
    }

    pub fn with_view(self, view: ViewMode) -> Self {
        Self { view, ..self }
    }

    pub fn group_label(&self) -> String {
        match self.group {
            Some(g) => format!("Skupina {}", g),
            None => "Všetky skupiny".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group() {
        assert_eq!(AppState::parse_group(None), None);
        assert_eq!(AppState::parse_group(Some("")), None);
        assert_eq!(AppState::parse_group(Some("0")), None);
        assert_eq!(AppState::parse_group(Some("abc")), None);
        assert_eq!(AppState::parse_group(Some(" 3 ")), Some(3));
    }

    #[test]
    fn test_state_is_replaced_not_mutated() {
        let s = AppState::from_query(Some("2"), ViewMode::Table);
        let t = s.with_group(None).with_view(ViewMode::Breaks);
        assert_eq!(s.group, Some(2));
        assert_eq!(s.view, ViewMode::Table);
        assert_eq!(t, AppState::new(None, ViewMode::Breaks));
        assert_eq!(t.group_label(), "Všetky skupiny");
    }

    #[test]
    fn test_view_mode_from_str() {
        assert_eq!("ICS".parse::<ViewMode>(), Ok(ViewMode::Ics));
        assert_eq!("breaks".parse::<ViewMode>(), Ok(ViewMode::Breaks));
        assert!("grid".parse::<ViewMode>().is_err());
    }
}
