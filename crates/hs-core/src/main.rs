//! Hall Scout - slot machine setting estimator
//!
//! The command-line entry point:
//! - `analyze`: read a source manifest and report on the whole hall
//! - `estimate`: posterior for a single machine
//! - `islands`: group machine numbers into islands
//! - `specs` / `check`: show and validate the spec table

use clap::{Args, Parser, Subcommand};
use hs_common::{Error, MachinePlacement, ObservationRecord, OutputFormat, SCHEMA_VERSION};
use hs_core::config::{load_config, ConfigOptions, ResolvedConfig};
use hs_core::exit_codes::ExitCode;
use hs_core::export::{default_export_name, write_csv_file};
use hs_core::inference::{estimate_one, ProbabilityModel};
use hs_core::layout::{classify, detect_islands};
use hs_core::logging::{
    event_names, generate_run_id, get_host_id, init_logging, LogConfig, LogContext, LogLevel,
    Stage,
};
use hs_core::output;
use hs_core::pipeline::analyze;
use hs_core::source::{parse_manifest, source_for_target, RecordSource};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Hall Scout - estimate slot machine settings from public play data
#[derive(Parser)]
#[command(name = "hall-scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Spec table JSON file (overrides HALL_SCOUT_SPEC_TABLE and the XDG config)
    #[arg(long, global = true)]
    spec_table: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate settings for every source in a manifest and report on the hall
    Analyze(AnalyzeArgs),

    /// Posterior over settings for one machine
    Estimate(EstimateArgs),

    /// Group machine numbers into islands
    Islands(IslandsArgs),

    /// Show the resolved spec table
    Specs,

    /// Validate the resolved spec table
    Check,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Manifest file: one `label, location` pair per line
    #[arg(long, short = 'm')]
    manifest: PathBuf,

    /// Write estimated records as CSV (a directory gets a timestamped file name)
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Machine model name (matched against the spec table)
    #[arg(long)]
    model: String,

    /// Total spins
    #[arg(long)]
    spins: u64,

    /// Small-win (RB) count
    #[arg(long)]
    small: u64,

    /// Big-win (BB) count
    #[arg(long)]
    big: u64,
}

#[derive(Args, Debug)]
struct IslandsArgs {
    /// Machine numbers; non-numeric ids are skipped
    #[arg(required = true)]
    ids: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            _ => Some(LogLevel::Debug),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, None));

    let ctx = LogContext::new(generate_run_id(), get_host_id());

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, args, &ctx),
        Commands::Estimate(args) => run_estimate(&cli.global, args, &ctx),
        Commands::Islands(args) => run_islands(&cli.global, args),
        Commands::Specs => run_specs(&cli.global, &ctx),
        Commands::Check => run_check(&cli.global, &ctx),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared helpers
// ============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print `value` as JSON, or report the serialization failure.
fn emit_json<T: Serialize>(global: &GlobalOpts, value: &T, ok: ExitCode) -> ExitCode {
    match print_json(value) {
        Ok(()) => ok,
        Err(err) => output_error(global, &err),
    }
}

fn output_error(global: &GlobalOpts, error: &Error) -> ExitCode {
    let exit_code = ExitCode::from(error);
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "status": "error",
                "exit_code": exit_code.code_name(),
                "error": error.to_json(),
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => eprintln!("{text}"),
                Err(_) => eprintln!("error: {error}"),
            }
        }
        OutputFormat::Summary => {
            eprintln!("[{}] {}", exit_code.code_name(), error);
        }
        OutputFormat::Md => {
            eprintln!("**Error {}**: {}", error.code(), error);
            eprintln!();
            eprintln!("{}", error.remediation());
        }
    }
    exit_code
}

fn load(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedConfig, ExitCode> {
    let options = ConfigOptions {
        spec_table_path: global.spec_table.clone(),
    };
    let config = load_config(&options).map_err(|e| output_error(global, &e.into()))?;

    let snapshot = config.snapshot();
    match &snapshot.spec_table_path {
        Some(path) => hs_core::log_event!(
            ctx,
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "spec table loaded",
            path = tracing::field::display(path.display()),
            source = snapshot.source.as_str(),
            models = snapshot.model_count
        ),
        None => hs_core::log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Init,
            "using built-in spec table",
            models = snapshot.model_count
        ),
    }
    for warning in &config.warnings {
        hs_core::log_event!(
            ctx,
            WARN,
            event_names::CONFIG_WARNING,
            Stage::Init,
            warning.message.as_str(),
            field = warning.field.as_str()
        );
    }
    Ok(config)
}

fn load_model(
    global: &GlobalOpts,
    ctx: &LogContext,
) -> Result<(ResolvedConfig, ProbabilityModel), ExitCode> {
    let config = load(global, ctx)?;
    let model = ProbabilityModel::new(&config.spec_table).map_err(|e| {
        let err: Error = hs_core::config::ConfigError::from(e).into();
        output_error(global, &err)
    })?;
    Ok((config, model))
}

/// Export target: a directory gets the timestamped default name.
fn export_path(requested: &Path) -> PathBuf {
    if requested.is_dir() {
        requested.join(default_export_name(chrono::Local::now().naive_local()))
    } else {
        requested.to_path_buf()
    }
}

// ============================================================================
// Commands
// ============================================================================

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs, ctx: &LogContext) -> ExitCode {
    hs_core::log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "analysis started",
        manifest = tracing::field::display(args.manifest.display())
    );

    let (config, model) = match load_model(global, ctx) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let text = match std::fs::read_to_string(&args.manifest) {
        Ok(text) => text,
        Err(e) => return output_error(global, &Error::Io(e)),
    };
    let targets = parse_manifest(&text);
    if targets.is_empty() {
        return output_error(global, &Error::EmptyManifest);
    }

    let base_dir = args.manifest.parent().unwrap_or_else(|| Path::new(""));
    let sources: Vec<Box<dyn RecordSource>> = targets
        .iter()
        .map(|target| source_for_target(target, base_dir))
        .collect();

    let outcome = match analyze(&model, &sources, ctx) {
        Ok(outcome) => outcome,
        Err(err) => return output_error(global, &err),
    };

    let exported = match &args.export {
        Some(requested) => {
            let path = export_path(requested);
            if let Err(err) = write_csv_file(&path, &outcome.estimated) {
                return output_error(global, &err.into());
            }
            hs_core::log_event!(
                ctx,
                INFO,
                event_names::EXPORT_WRITTEN,
                Stage::Export,
                "export written",
                path = tracing::field::display(path.display()),
                records = outcome.estimated.len()
            );
            Some(path)
        }
        None => None,
    };

    let exit_code = if outcome.is_partial() {
        ExitCode::PartialSources
    } else {
        ExitCode::Clean
    };
    hs_core::log_event!(
        ctx,
        INFO,
        event_names::RUN_FINISHED,
        Stage::Aggregate,
        "analysis finished",
        exit_code = exit_code.code_name()
    );

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "command": "analyze",
                "status": if outcome.is_partial() { "partial" } else { "ok" },
                "config": config.snapshot(),
                "export_path": exported.as_ref().map(|p| p.display().to_string()),
                "analysis": outcome,
            });
            emit_json(global, &response, exit_code)
        }
        OutputFormat::Md => {
            println!("{}", output::analysis_markdown(&outcome));
            if let Some(path) = &exported {
                println!();
                println!("Exported to `{}`", path.display());
            }
            exit_code
        }
        OutputFormat::Summary => {
            println!("[{}] {}", ctx.run_id, output::analysis_summary(&outcome));
            exit_code
        }
    }
}

fn run_estimate(global: &GlobalOpts, args: &EstimateArgs, ctx: &LogContext) -> ExitCode {
    if args.spins == 0 {
        return output_error(
            global,
            &Error::InvalidArgs("--spins must be greater than zero".to_string()),
        );
    }

    let (config, model) = match load_model(global, ctx) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let observation = ObservationRecord {
        date_label: String::new(),
        machine_id: String::new(),
        model: args.model.clone(),
        spins: args.spins,
        small_wins: args.small,
        big_wins: args.big,
    };
    let resolved = model.resolve(&args.model).name.clone();
    let posterior = estimate_one(&model, &observation);
    if posterior.is_degenerate() {
        hs_core::log_event!(
            ctx,
            WARN,
            event_names::ESTIMATE_DEGENERATE,
            Stage::Estimate,
            "no setting explains the counts"
        );
    }

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "command": "estimate",
                "model": args.model,
                "resolved_model": resolved,
                "matched": model.is_known(&args.model),
                "observation": {
                    "spins": args.spins,
                    "small_wins": args.small,
                    "big_wins": args.big,
                },
                "posterior": posterior,
                "config": config.snapshot(),
            });
            emit_json(global, &response, ExitCode::Clean)
        }
        OutputFormat::Md => {
            println!("{}", output::estimate_markdown(&resolved, &observation, &posterior));
            ExitCode::Clean
        }
        OutputFormat::Summary => {
            println!("{}", output::estimate_summary(&resolved, &posterior));
            ExitCode::Clean
        }
    }
}

fn run_islands(global: &GlobalOpts, args: &IslandsArgs) -> ExitCode {
    let mut mids = Vec::new();
    let mut skipped = Vec::new();
    for id in &args.ids {
        match MachinePlacement::parse(id) {
            Some(placement) => mids.push(placement.mid),
            None => skipped.push(id.clone()),
        }
    }
    let islands = detect_islands(&mids);

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "command": "islands",
                "islands": islands,
                "positions": classify(&islands),
                "skipped": skipped,
            });
            emit_json(global, &response, ExitCode::Clean)
        }
        OutputFormat::Md => {
            println!("{}", output::islands_markdown(&islands));
            if !skipped.is_empty() {
                println!();
                println!("Skipped: {}", skipped.join(", "));
            }
            ExitCode::Clean
        }
        OutputFormat::Summary => {
            let sizes: Vec<String> = islands.iter().map(|i| i.len().to_string()).collect();
            println!("{} island(s): sizes {}", islands.len(), sizes.join(", "));
            ExitCode::Clean
        }
    }
}

fn run_specs(global: &GlobalOpts, ctx: &LogContext) -> ExitCode {
    let config = match load(global, ctx) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "command": "specs",
                "config": config.snapshot(),
                "spec_table": config.spec_table,
            });
            emit_json(global, &response, ExitCode::Clean)
        }
        OutputFormat::Md => {
            println!("{}", output::specs_markdown(&config.spec_table));
            ExitCode::Clean
        }
        OutputFormat::Summary => {
            println!(
                "{} models, default {} ({})",
                config.spec_table.models.len(),
                config.spec_table.default_model,
                config.source
            );
            ExitCode::Clean
        }
    }
}

fn run_check(global: &GlobalOpts, ctx: &LogContext) -> ExitCode {
    let config = match load(global, ctx) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "command": "check",
                "status": "valid",
                "config": config.snapshot(),
                "warnings": config.warnings,
            });
            emit_json(global, &response, ExitCode::Clean)
        }
        OutputFormat::Md => {
            println!("# hall-scout check");
            println!();
            println!("✓ spec table: valid ({})", config.source);
            for warning in &config.warnings {
                println!("  ⚠ {}: {}", warning.field, warning.message);
            }
            ExitCode::Clean
        }
        OutputFormat::Summary => {
            println!("OK ({} warning(s))", config.warnings.len());
            ExitCode::Clean
        }
    }
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "hall_scout_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&version_info) {
            Ok(text) => println!("{text}"),
            Err(_) => println!("hall-scout {}", env!("CARGO_PKG_VERSION")),
        },
        _ => {
            println!("hall-scout {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}
