// File: ./src/report.rs
//! Plain-text rendering of the derived views for the terminal.
use crate::calendar::{self, CalendarEvent};
use crate::config::Config;
use crate::model::{Day, Lesson, Recurrence};
use crate::schedule::{BreakComparison, BreakMap, BreakPolicy, Extremes, Schedule, ScheduleStats};
use crate::state::{AppState, ViewMode};
use anyhow::Result;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

fn pad(cell: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(cell);
    let mut s = cell.to_string();
    s.extend(std::iter::repeat_n(' ', width.saturating_sub(w)));
    s
}

/// Aligns columns by display width, so `Š`, `ľ` and friends count as one.
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

pub fn render_table(lessons: &[Lesson]) -> String {
    let rows: Vec<Vec<String>> = lessons
        .iter()
        .map(|l| {
            let recurrence = match l.recurrence {
                Recurrence::Weekly => l.recurrence.code().to_string(),
                // Irregular weeks get flagged so they stand out.
                _ => format!("*{}", l.recurrence.code()),
            };
            vec![
                l.day.full_name().to_string(),
                recurrence,
                l.time.to_string(),
                l.subject_name.clone(),
                l.kind.code().to_string(),
                l.room.clone(),
                l.instructor.clone(),
                l.groups_label(),
            ]
        })
        .collect();

    render_grid(
        &["Deň", "Pravidelnosť", "Čas", "Predmet", "Typ", "Miestnosť", "Vyučujúci", "Skupiny"],
        &rows,
    )
}

pub fn render_breaks(breaks: &BreakMap, policy: BreakPolicy) -> String {
    let rows: Vec<Vec<String>> = breaks
        .iter()
        .flat_map(|(day, list)| {
            list.iter().map(move |b| {
                vec![
                    day.full_name().to_string(),
                    b.start.to_string(),
                    b.end.to_string(),
                    b.minutes.to_string(),
                    b.formatted.clone(),
                ]
            })
        })
        .collect();

    let operator = match policy.comparison {
        BreakComparison::Inclusive => "≥",
        BreakComparison::Exclusive => ">",
    };
    let mut out = format!("Dlhé prestávky ({} {} minút):\n", operator, policy.min_minutes);
    if rows.is_empty() {
        out.push_str("  žiadne\n");
        return out;
    }
    out.push_str(&render_grid(
        &["Deň", "Začiatok prestávky", "Koniec prestávky", "Trvanie (minúty)", "Trvanie"],
        &rows,
    ));
    out
}

pub fn render_extremes(extremes: &Extremes) -> String {
    let join = |list: &[crate::schedule::DayTime]| {
        if list.is_empty() {
            return "-".to_string();
        }
        list.iter()
            .map(|dt| format!("{} ({})", dt.day.full_name(), dt.time))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Najskorší začiatok: {}\nNajneskorší koniec: {}\n",
        join(&extremes.earliest),
        join(&extremes.latest)
    )
}

pub fn render_elective_days(days: &[Day]) -> String {
    let names = if days.is_empty() {
        "-".to_string()
    } else {
        days.iter()
            .map(|d| d.full_name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("Nepovinné dni: {}\n", names)
}

pub fn render_stats(stats: &ScheduleStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Počet hodín v rozvrhu: {}\n", stats.lessons));
    out.push_str(&format!("Predmety: {}\n", stats.subjects));
    out.push_str(&format!(
        "Čas vo výučbe týždenne: {}\n",
        crate::model::format_duration(stats.total_minutes.max(0) as u32)
    ));
    out.push_str(&format!("Vyučovacie hodiny spolu: {}\n", stats.total_hours));
    for (kind, count) in &stats.by_kind {
        out.push_str(&format!("  {}: {}\n", kind, count));
    }
    for (day, count) in &stats.per_day {
        out.push_str(&format!("  {}: {}\n", day.full_name(), count));
    }
    out
}

pub fn render_calendar(events: &[CalendarEvent]) -> String {
    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|e| {
            vec![
                e.week_number.to_string(),
                e.date.format("%d.%m.%Y").to_string(),
                e.day.full_name().to_string(),
                format!("{}-{}", e.start, e.end),
                e.title.clone(),
                e.room.clone(),
            ]
        })
        .collect();
    render_grid(&["Týždeň", "Dátum", "Deň", "Čas", "Udalosť", "Miestnosť"], &rows)
}

// --- VIEW DISPATCH ---

#[derive(Serialize)]
struct SummaryJson<'a> {
    group: Option<u8>,
    table: &'a [Lesson],
    breaks: &'a BreakMap,
    extremes: &'a Extremes,
    elective_days: &'a [Day],
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

/// Renders the view selected in `state`, as text or JSON.
/// ICS output ignores `json`.
pub fn render_view(
    schedule: &mut Schedule,
    state: &AppState,
    config: &Config,
    json: bool,
) -> Result<String> {
    let group = state.group;
    let policy = config.break_policy();

    let out = match state.view {
        ViewMode::Summary => {
            let table = schedule.sorted_table(group);
            let breaks = schedule.long_breaks(group, policy);
            let extremes = schedule.extremes(group);
            let electives = schedule.elective_days(group);
            if json {
                return to_json(&SummaryJson {
                    group,
                    table: &table,
                    breaks: &breaks,
                    extremes: &extremes,
                    elective_days: &electives,
                });
            }
            let mut out = format!("{}\n\n", state.group_label());
            out.push_str(&render_table(&table));
            out.push('\n');
            out.push_str(&render_breaks(&breaks, policy));
            out.push('\n');
            out.push_str(&render_extremes(&extremes));
            out.push_str(&render_elective_days(&electives));
            out
        }
        ViewMode::Table => {
            let table = schedule.sorted_table(group);
            if json {
                return to_json(&table);
            }
            render_table(&table)
        }
        ViewMode::Breaks => {
            let breaks = schedule.long_breaks(group, policy);
            if json {
                return to_json(&breaks);
            }
            render_breaks(&breaks, policy)
        }
        ViewMode::Extremes => {
            let extremes = schedule.extremes(group);
            if json {
                return to_json(&extremes);
            }
            render_extremes(&extremes)
        }
        ViewMode::Electives => {
            let days = schedule.elective_days(group);
            if json {
                return to_json(&days);
            }
            render_elective_days(&days)
        }
        ViewMode::Stats => {
            let stats = schedule.statistics(group);
            if json {
                return to_json(&stats);
            }
            render_stats(&stats)
        }
        ViewMode::Calendar | ViewMode::Ics => {
            let events = calendar::project(schedule.filter_by_group(group), &config.semester());
            match (state.view, json) {
                (ViewMode::Ics, _) => calendar::to_ics(&events),
                (_, true) => return to_json(&events),
                _ => render_calendar(&events),
            }
        }
    };
    Ok(out)
}
