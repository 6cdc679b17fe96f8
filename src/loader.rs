// File: ./src/loader.rs
//! Concurrent loading of schedule documents.
//!
//! Fetching and parsing run concurrently; merging happens afterwards, in
//! manifest order, on the caller's schedule. A source that fails to fetch or
//! is not a table is logged and skipped.
use crate::manifest::Manifest;
use crate::model::{GroupRange, Lesson};
use crate::schedule::Schedule;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Outcome of loading a set of sources.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub lessons: usize,
}

impl LoadReport {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Fetches every source with at most `concurrency` requests in flight and
/// parses each into lessons. Results keep the order of `sources`.
pub async fn fetch_documents<F, Fut>(
    sources: Vec<String>,
    concurrency: usize,
    range: GroupRange,
    fetch: F,
) -> Vec<(String, Result<Vec<Lesson>>)>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let futures = sources.into_iter().map(|source| {
        let fut = fetch(source.clone());
        async move {
            let parsed = match fut.await {
                Ok(html) => Schedule::parse_document(&html, range)
                    .with_context(|| format!("Could not parse '{}'", source)),
                Err(e) => Err(e),
            };
            (source, parsed)
        }
    });

    stream::iter(futures)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Merges fetched results into `schedule` one source at a time.
pub fn merge_results(
    schedule: &mut Schedule,
    results: Vec<(String, Result<Vec<Lesson>>)>,
) -> LoadReport {
    let mut report = LoadReport::default();

    for (source, result) in results {
        match result {
            Ok(lessons) => {
                log::debug!("{}: {} lessons", source, lessons.len());
                report.lessons += lessons.len();
                schedule.merge(lessons);
                report.loaded.push(source);
            }
            Err(e) => {
                log::warn!("Skipping schedule source '{}': {:#}", source, e);
                report.failed.push((source, format!("{:#}", e)));
            }
        }
    }
    schedule.invalidate_cache();
    log::info!(
        "Loaded {} lessons from {} sources ({} failed)",
        report.lessons,
        report.loaded.len(),
        report.failed.len()
    );
    report
}

async fn read_file(path: String) -> Result<String> {
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read '{}'", path))
}

/// Loads every document listed in the manifest at `manifest_path` into a
/// fresh schedule.
pub async fn load_manifest(
    manifest_path: &Path,
    concurrency: usize,
    range: GroupRange,
) -> Result<(Schedule, LoadReport)> {
    let manifest = Manifest::load(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let sources: Vec<String> = manifest
        .resolve(base)
        .into_iter()
        .map(|p: PathBuf| p.to_string_lossy().into_owned())
        .collect();

    let results = fetch_documents(sources, concurrency, range, read_file).await;
    let mut schedule = Schedule::with_group_range(range);
    let report = merge_results(&mut schedule, results);
    Ok((schedule, report))
}
