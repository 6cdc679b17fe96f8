// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help text.
use crate::state::ViewMode;
use anyhow::{Result, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    /// Raw group selector, interpreted by `AppState::parse_group`.
    pub group: Option<String>,
    pub view: ViewMode,
    pub json: bool,
    pub verbose: u8,
    pub help: bool,
}

fn take_value<'a>(flag: &str, it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String> {
    match it.next() {
        Some(v) => Ok(v),
        None => bail!("Missing value for '{}'", flag),
    }
}

/// Parses everything after the binary name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut view_seen = false;
    let mut it = args.iter();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => out.help = true,
            "-r" | "--root" => out.root = Some(PathBuf::from(take_value(arg, &mut it)?)),
            "-m" | "--manifest" => out.manifest = Some(PathBuf::from(take_value(arg, &mut it)?)),
            "-g" | "--group" => out.group = Some(take_value(arg, &mut it)?.clone()),
            "--json" => out.json = true,
            "-v" | "--verbose" => out.verbose = out.verbose.saturating_add(1),
            "-vv" => out.verbose = out.verbose.saturating_add(2),
            s if s.starts_with("--group=") => {
                out.group = Some(s.trim_start_matches("--group=").to_string())
            }
            s if s.starts_with('-') => bail!("Unknown option '{}'", s),
            s if !view_seen => match s.parse::<ViewMode>() {
                Ok(view) => {
                    out.view = view;
                    view_seen = true;
                }
                Err(_) if out.manifest.is_none() => out.manifest = Some(PathBuf::from(s)),
                Err(e) => bail!(e),
            },
            s if out.manifest.is_none() => out.manifest = Some(PathBuf::from(s)),
            s => bail!("Unexpected argument '{}'", s),
        }
    }
    Ok(out)
}

/// Maps `-v` occurrences onto a log level, or `None` to keep the configured one.
pub fn verbosity_level(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "Classgrid v{} - Merge and analyse class timetables",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [view] [options] [manifest.json]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("VIEWS:");
    println!("    summary               Table, long breaks, extremes and elective days (default)");
    println!("    table                 Lessons sorted by day and start time");
    println!("    breaks                Gaps between consecutive lessons above the threshold");
    println!("    extremes              Earliest start and latest end per day");
    println!("    electives             Days consisting only of lectures");
    println!("    stats                 Lesson counts and teaching time");
    println!("    calendar              Dated events for every semester week");
    println!("    ics                   The same events as an iCalendar file on stdout");
    println!();
    println!("OPTIONS:");
    println!("    -g, --group <n>       Show only lessons for study group n (0 = all groups).");
    println!("    -m, --manifest <path> Manifest listing the HTML schedules to merge.");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    --json                Print the selected view as JSON.");
    println!("    -v, --verbose         More log output on stderr (repeat for debug).");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!("    {} table --group 2", binary_name);
    println!("    {} breaks rozvrhy/zoznam.json", binary_name);
    println!("    {} ics --group 3 > rozvrh.ics", binary_name);
    println!();
    println!("MORE INFO:");
    println!("    License:    GPL-3.0");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed, CliArgs::default());
        assert_eq!(parsed.view, ViewMode::Summary);
    }

    #[test]
    fn test_view_group_and_manifest() {
        let parsed = parse_args(&args(&["breaks", "-g", "2", "data/list.json", "--json"])).unwrap();
        assert_eq!(parsed.view, ViewMode::Breaks);
        assert_eq!(parsed.group.as_deref(), Some("2"));
        assert_eq!(parsed.manifest, Some(PathBuf::from("data/list.json")));
        assert!(parsed.json);
    }

    #[test]
    fn test_manifest_without_view() {
        let parsed = parse_args(&args(&["list.json", "--group=0"])).unwrap();
        assert_eq!(parsed.view, ViewMode::Summary);
        assert_eq!(parsed.manifest, Some(PathBuf::from("list.json")));
        assert_eq!(parsed.group.as_deref(), Some("0"));
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(&args(&["--group"])).is_err());
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
        assert!(parse_args(&args(&["table", "a.json", "b.json"])).is_err());
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(verbosity_level(0), None);
        assert_eq!(verbosity_level(1), Some(log::LevelFilter::Info));
        assert_eq!(verbosity_level(2), Some(log::LevelFilter::Debug));
        let parsed = parse_args(&args(&["-v", "-v"])).unwrap();
        assert_eq!(parsed.verbose, 2);
    }
}
