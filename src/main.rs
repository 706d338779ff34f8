use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

mod commands;

/// Find cyclic chains in unit-of-measure conversion rules.
#[derive(Parser)]
#[command(name = "ug", version, about)]
struct Cli {
    /// Config file (defaults to unitgraph.toml next to the rules file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every elementary conversion cycle
    Cycles {
        /// Rule file (.toml, .json, .yaml)
        rules: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// List at most this many cycles (0 = all)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List groups of mutually convertible units
    Sccs {
        rules: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Exit non-zero if the rules contain a conversion cycle
    Check {
        rules: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn rules(&self) -> &PathBuf {
        match self {
            Commands::Cycles { rules, .. } | Commands::Sccs { rules, .. } | Commands::Check { rules, .. } => {
                rules
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = commands::load_config(cli.config.as_deref(), cli.command.rules())?;
    debug!("config: {:?}", config);

    match cli.command {
        Commands::Cycles { rules, json, limit } => commands::cycles::run(
            &rules,
            json || config.report.json,
            limit.unwrap_or(config.report.limit),
        ),
        Commands::Sccs { rules, json } => commands::sccs::run(&rules, json || config.report.json),
        Commands::Check { rules, json } => {
            let clean = commands::check::run(&rules, json || config.report.json)?;
            if !clean && config.check.fail_on_cycle {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
