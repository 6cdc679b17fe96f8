use anyhow::Result;
use classgrid::cli::{self, CliArgs};
use classgrid::config::Config;
use classgrid::context::{AppContext, StandardContext};
use classgrid::loader;
use classgrid::report;
use classgrid::state::AppState;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::env;

fn init_logging(config: &Config, args: &CliArgs) {
    let level = cli::verbosity_level(args.verbose).unwrap_or_else(|| config.log_level());
    let log_config = ConfigBuilder::new()
        .set_time_level(log::LevelFilter::Off)
        .build();
    // Logs go to stderr so stdout stays clean for `ics` and `--json`.
    if let Err(e) = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let argv: Vec<String> = env::args().collect();
    let binary_name = argv.first().map(String::as_str).unwrap_or("classgrid");
    let args = cli::parse_args(argv.get(1..).unwrap_or_default())?;

    if args.help {
        cli::print_help(binary_name);
        return Ok(());
    }

    let ctx = StandardContext::new(args.root.clone());
    let config = Config::load(&ctx)?;
    init_logging(&config, &args);

    let manifest = args.manifest.clone().unwrap_or_else(|| config.manifest.clone());
    let manifest = ctx.resolve_manifest(&manifest);
    log::debug!("Using manifest {}", manifest.display());

    let (mut schedule, load) =
        loader::load_manifest(&manifest, config.max_concurrent_loads, config.group_range()).await?;

    if load.is_partial() {
        eprintln!(
            "Warning: {} of {} schedules could not be loaded:",
            load.failed.len(),
            load.failed.len() + load.loaded.len()
        );
        for (source, reason) in &load.failed {
            eprintln!("  {}: {}", source, reason);
        }
    }

    let group = match args.group.as_deref() {
        Some(raw) => AppState::parse_group(Some(raw)),
        None => config.default_group,
    };
    let state = AppState::new(group, args.view);

    let out = report::render_view(&mut schedule, &state, &config, args.json)?;
    print!("{}", out);
    Ok(())
}
