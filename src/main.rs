//! Grading Checker CLI
//!
//! Entry point for the `grading-checker` command-line tool.

use clap::{Args, Parser, Subcommand};
use grading_checker::{
    CheckError, CheckerConfig, ConsoleReporter, FailurePolicy, GradingChecker, MemoryReporter,
    ProjectTree, ReportLine, RunSummary,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

/// Every check passed
const EXIT_OK: i32 = 0;
/// A configuration is invalid or submit names collide
const EXIT_INVALID: i32 = 1;
/// A file could not be read or parsed, or the checker config is bad
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "grading-checker")]
#[command(about = "Validate grading.yml and submit.yml files before grading", version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project tree (default)
    Check(CheckArgs),

    /// Print the effective configuration a grading file is validated as
    Explain {
        /// The grading file to explain
        file: PathBuf,

        /// Project root (default: current directory)
        #[arg(long, short = 'r', default_value = ".")]
        root: PathBuf,

        /// Path to checker config (default: <root>/.grading-checker.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Clone)]
struct CheckArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Path to checker config (default: <root>/.grading-checker.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Report every invalid configuration instead of stopping at the first
    #[arg(long)]
    keep_going: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

/// JSON output of a check run
#[derive(Serialize)]
struct CheckOutput {
    passed: bool,
    lines: Vec<ReportLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Commands::Check(args)) => run_check(args),
        Some(Commands::Explain {
            file,
            root,
            config,
            json,
        }) => run_explain(&file, &root, config.as_deref(), json),
        None => run_check(cli.check),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn load_config(root: &Path, explicit: Option<&Path>) -> CheckerConfig {
    match CheckerConfig::load(root, explicit) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading checker config: {}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn run_check(args: CheckArgs) {
    let config = load_config(&args.root, args.config.as_deref());
    let policy = if args.keep_going || config.keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    };
    log::info!("checking {} ({:?})", args.root.display(), policy);

    let project = ProjectTree::new(&args.root, &config);

    if args.json {
        let mut checker = GradingChecker::new(project, MemoryReporter::new(), policy);
        let result = checker.run();
        let lines = checker.into_reporter().into_lines();

        let output = match &result {
            Ok(summary) => CheckOutput {
                passed: true,
                lines,
                summary: Some(summary.clone()),
                error: None,
            },
            Err(e) => CheckOutput {
                passed: false,
                lines,
                summary: None,
                error: Some(e.to_string()),
            },
        };

        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(EXIT_ERROR);
            }
        }
        process::exit(exit_code(&result));
    }

    let mut checker = GradingChecker::new(project, ConsoleReporter::stdout(), policy);
    let result = checker.run();
    if let Err(CheckError::Load(e)) = &result {
        eprintln!("{}", e);
    }
    process::exit(exit_code(&result));
}

fn exit_code(result: &Result<RunSummary, CheckError>) -> i32 {
    match result {
        Ok(_) => EXIT_OK,
        Err(e) if e.is_violation() => EXIT_INVALID,
        Err(_) => EXIT_ERROR,
    }
}

fn run_explain(file: &Path, root: &Path, config_path: Option<&Path>, json: bool) {
    let config = load_config(root, config_path);
    let project = ProjectTree::new(root, &config);

    // Discovered paths are root-joined; resolve the argument the same way.
    let file = if file.is_relative() && !file.starts_with(root) {
        root.join(file)
    } else {
        file.to_path_buf()
    };

    let checker = GradingChecker::new(project, MemoryReporter::new(), FailurePolicy::FailFast);
    let effective = match checker.explain(&file) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_ERROR);
        }
    };

    let rendered = if json {
        serde_json::to_string_pretty(&effective).map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(&effective).map_err(|e| e.to_string())
    };

    match rendered {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(EXIT_ERROR);
        }
    }
}
