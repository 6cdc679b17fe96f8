// File: ./src/schedule.rs
use crate::error::Result;
use crate::html;
use crate::model::{ClockTime, Day, GroupRange, Lesson, format_duration};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use strum::IntoEnumIterator;

// --- DERIVED VIEW TYPES ---

/// How a gap is compared against the minimum break length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakComparison {
    /// `gap >= min`
    #[default]
    Inclusive,
    /// `gap > min`
    Exclusive,
}

impl BreakComparison {
    pub fn accepts(&self, gap: i32, min_minutes: u32) -> bool {
        let gap = gap as i64;
        let min = min_minutes as i64;
        match self {
            BreakComparison::Inclusive => gap >= min,
            BreakComparison::Exclusive => gap > min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakPolicy {
    pub min_minutes: u32,
    pub comparison: BreakComparison,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            min_minutes: 30,
            comparison: BreakComparison::Inclusive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub start: ClockTime,
    pub end: ClockTime,
    pub minutes: u32,
    pub formatted: String,
}

/// Every day is present as a key, days without breaks map to an empty list.
pub type BreakMap = BTreeMap<Day, Vec<BreakInterval>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: Day,
    pub time: ClockTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extremes {
    pub earliest: Vec<DayTime>,
    pub latest: Vec<DayTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub lessons: usize,
    pub total_minutes: i64,
    pub total_hours: u32,
    pub subjects: usize,
    pub by_kind: BTreeMap<String, usize>,
    pub per_day: BTreeMap<Day, usize>,
}

// --- CACHE ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    SortedTable { group: Option<u8> },
    LongBreaks { group: Option<u8>, policy: BreakPolicy },
    Extremes { group: Option<u8> },
    ElectiveDays { group: Option<u8> },
    Statistics { group: Option<u8> },
}

#[derive(Debug, Clone)]
enum CachedView {
    Table(Vec<Lesson>),
    Breaks(BreakMap),
    Extremes(Extremes),
    Days(Vec<Day>),
    Stats(ScheduleStats),
}

// --- SCHEDULE ---

/// Lessons merged from every source document, plus memoized derived views.
///
/// The cache is never cleared automatically: call [`Schedule::invalidate_cache`]
/// after [`Schedule::merge`] if views were already computed.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    lessons: Vec<Lesson>,
    range: GroupRange,
    cache: HashMap<CacheKey, CachedView>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group_range(range: GroupRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn group_range(&self) -> GroupRange {
        self.range
    }

    /// Parses one schedule document. Invalid rows are logged and skipped;
    /// only a document with no table at all is an error.
    pub fn parse_document(html: &str, range: GroupRange) -> Result<Vec<Lesson>> {
        let rows = html::table_rows(html)?;
        let mut lessons = Vec::with_capacity(rows.len());

        for (idx, cells) in rows.iter().enumerate() {
            match Lesson::from_cells(cells, range) {
                Ok(lesson) => lessons.push(lesson),
                Err(e) => log::warn!("Skipping row {}: {}", idx + 1, e),
            }
        }
        Ok(lessons)
    }

    /// Appends lessons. Duplicates are kept.
    pub fn merge(&mut self, lessons: Vec<Lesson>) {
        log::debug!("Merging {} lessons into {}", lessons.len(), self.lessons.len());
        self.lessons.extend(lessons);
    }

    /// Parses and merges one document, returning the number of lessons added.
    pub fn merge_document(&mut self, html: &str) -> Result<usize> {
        let lessons = Self::parse_document(html, self.range)?;
        let count = lessons.len();
        self.merge(lessons);
        Ok(count)
    }

    pub fn clear(&mut self) {
        self.lessons.clear();
        self.cache.clear();
    }

    pub fn invalidate_cache(&mut self) {
        log::debug!("Dropping {} cached views", self.cache.len());
        self.cache.clear();
    }

    pub fn cached_views(&self) -> usize {
        self.cache.len()
    }

    // --- Core Logic Helpers ---

    /// The one filtering primitive: no group keeps everything, otherwise
    /// lessons without group restriction plus those naming `group`.
    pub fn filter_by_group(&self, group: Option<u8>) -> Vec<&Lesson> {
        self.lessons.iter().filter(|l| l.applies_to(group)).collect()
    }

    fn lessons_on(&self, day: Day, group: Option<u8>) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self
            .filter_by_group(group)
            .into_iter()
            .filter(|l| l.day == day)
            .collect();
        lessons.sort_by_key(|l| l.start());
        lessons
    }

    fn cached<F>(&mut self, key: CacheKey, compute: F) -> CachedView
    where
        F: FnOnce(&Self) -> CachedView,
    {
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("Cache hit for {:?}", key);
            return hit.clone();
        }
        log::debug!("Cache miss for {:?}", key);
        let view = compute(self);
        self.cache.insert(key, view.clone());
        view
    }

    // --- Derived Views ---

    /// Filtered lessons ordered by day, then by start time.
    pub fn sorted_table(&mut self, group: Option<u8>) -> Vec<Lesson> {
        match self.cached(CacheKey::SortedTable { group }, |s| {
            CachedView::Table(s.compute_sorted_table(group))
        }) {
            CachedView::Table(t) => t,
            _ => self.compute_sorted_table(group),
        }
    }

    fn compute_sorted_table(&self, group: Option<u8>) -> Vec<Lesson> {
        let mut table: Vec<Lesson> = self.filter_by_group(group).into_iter().cloned().collect();
        table.sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.start().cmp(&b.start())));
        table
    }

    /// Gaps between consecutive lessons of each day that meet `policy`.
    pub fn long_breaks(&mut self, group: Option<u8>, policy: BreakPolicy) -> BreakMap {
        match self.cached(CacheKey::LongBreaks { group, policy }, |s| {
            CachedView::Breaks(s.compute_long_breaks(group, policy))
        }) {
            CachedView::Breaks(b) => b,
            _ => self.compute_long_breaks(group, policy),
        }
    }

    fn compute_long_breaks(&self, group: Option<u8>, policy: BreakPolicy) -> BreakMap {
        let mut breaks = BreakMap::new();

        for day in Day::iter() {
            let lessons = self.lessons_on(day, group);
            let intervals = lessons
                .windows(2)
                .filter_map(|pair| {
                    let end = pair[0].end();
                    let next_start = pair[1].start();
                    // Overlapping lessons give a negative gap and never count.
                    let gap = end.minutes_until(&next_start);
                    if gap < 0 || !policy.comparison.accepts(gap, policy.min_minutes) {
                        return None;
                    }
                    Some(BreakInterval {
                        start: end,
                        end: next_start,
                        minutes: gap as u32,
                        formatted: format_duration(gap as u32),
                    })
                })
                .collect();
            breaks.insert(day, intervals);
        }
        breaks
    }

    /// Days reaching the globally earliest start and the globally latest end.
    pub fn extremes(&mut self, group: Option<u8>) -> Extremes {
        match self.cached(CacheKey::Extremes { group }, |s| {
            CachedView::Extremes(s.compute_extremes(group))
        }) {
            CachedView::Extremes(e) => e,
            _ => self.compute_extremes(group),
        }
    }

    fn compute_extremes(&self, group: Option<u8>) -> Extremes {
        let lessons = self.filter_by_group(group);
        if lessons.is_empty() {
            return Extremes::default();
        }

        let mut earliest = ClockTime::LAST_MINUTE;
        let mut latest = ClockTime::MIDNIGHT;
        let mut earliest_days: BTreeMap<Day, ClockTime> = BTreeMap::new();
        let mut latest_days: BTreeMap<Day, ClockTime> = BTreeMap::new();

        for lesson in lessons {
            let start = lesson.start();
            if start < earliest {
                earliest_days.clear();
                earliest = start;
            }
            if start == earliest {
                earliest_days.entry(lesson.day).or_insert(start);
            }

            let end = lesson.end();
            if end > latest {
                latest_days.clear();
                latest = end;
            }
            if end == latest {
                latest_days.entry(lesson.day).or_insert(end);
            }
        }

        let to_list = |m: BTreeMap<Day, ClockTime>| {
            m.into_iter()
                .map(|(day, time)| DayTime { day, time })
                .collect()
        };
        Extremes {
            earliest: to_list(earliest_days),
            latest: to_list(latest_days),
        }
    }

    /// Days that have lessons, all of them lectures.
    pub fn elective_days(&mut self, group: Option<u8>) -> Vec<Day> {
        match self.cached(CacheKey::ElectiveDays { group }, |s| {
            CachedView::Days(s.compute_elective_days(group))
        }) {
            CachedView::Days(d) => d,
            _ => self.compute_elective_days(group),
        }
    }

    fn compute_elective_days(&self, group: Option<u8>) -> Vec<Day> {
        let mut mandatory: BTreeMap<Day, usize> = BTreeMap::new();
        for lesson in self.filter_by_group(group) {
            let count = mandatory.entry(lesson.day).or_insert(0);
            if !lesson.kind.is_lecture() {
                *count += 1;
            }
        }
        mandatory
            .into_iter()
            .filter(|(_, count)| *count == 0)
            .map(|(day, _)| day)
            .collect()
    }

    pub fn statistics(&mut self, group: Option<u8>) -> ScheduleStats {
        match self.cached(CacheKey::Statistics { group }, |s| {
            CachedView::Stats(s.compute_statistics(group))
        }) {
            CachedView::Stats(s) => s,
            _ => self.compute_statistics(group),
        }
    }

    fn compute_statistics(&self, group: Option<u8>) -> ScheduleStats {
        let lessons = self.filter_by_group(group);
        let mut stats = ScheduleStats {
            lessons: lessons.len(),
            ..ScheduleStats::default()
        };
        let mut subjects = BTreeSet::new();

        for lesson in lessons {
            stats.total_minutes += lesson.duration_minutes().max(0) as i64;
            stats.total_hours += lesson.hours;
            *stats.by_kind.entry(lesson.kind.label().to_string()).or_insert(0) += 1;
            *stats.per_day.entry(lesson.day).or_insert(0) += 1;

            let subject = if lesson.subject_code.is_empty() {
                &lesson.subject_name
            } else {
                &lesson.subject_code
            };
            subjects.insert(subject.clone());
        }
        stats.subjects = subjects.len();
        stats
    }
}
