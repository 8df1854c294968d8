pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mashti_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use mashti_core::recommend::RawPreferenceQuery;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "mashti",
    about = "Mashti recommendation engine CLI",
    long_about = "Operate the Mashti menu catalog, inspect configuration, and exercise the \
                  decision-tree navigator and recommender end to end.",
    after_help = "Examples:\n  mashti seed\n  mashti walk 1 0 0 0\n  \
                  mashti recommend --temperature cold --flavor fruity\n  mashti doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a mashti.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo menu and verify it")]
    Seed,
    #[command(about = "Run end-to-end readiness checks with per-check timing details")]
    Smoke,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, the decision tree, and catalog connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Show the attributes the enrichment pipeline derives for one item")]
    Enrich {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, help = "Decimal price, e.g. 4.50")]
        price: Option<String>,
        #[arg(long, help = "Mark the item as a house favourite")]
        popular: bool,
    },
    #[command(about = "Recommend up to three items for the given preferences")]
    Recommend(RecommendArgs),
    #[command(about = "Walk the decision tree with scripted steps and resolve the result")]
    Walk {
        #[arg(
            value_name = "STEP",
            allow_hyphen_values = true,
            help = "Option index to choose, `back`, or `restart`"
        )]
        steps: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct RecommendArgs {
    #[arg(long, help = "hot | cold | both")]
    temperature: Option<String>,
    #[arg(long, help = "morning | afternoon | evening | night")]
    time_of_day: Option<String>,
    #[arg(long)]
    flavor: Option<String>,
    #[arg(long, help = "yes | no")]
    caffeine: Option<String>,
    #[arg(long)]
    health_goal: Option<String>,
    #[arg(long = "diet", help = "Dietary restriction; repeat for several")]
    diets: Vec<String>,
}

impl From<RecommendArgs> for RawPreferenceQuery {
    fn from(args: RecommendArgs) -> Self {
        Self {
            temperature: args.temperature,
            time_of_day: args.time_of_day,
            flavor: args.flavor,
            caffeine: args.caffeine,
            health_goal: args.health_goal,
            dietary_restrictions: args.diets,
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions { config_path: cli.config, ..LoadOptions::default() };

    if let Err(error) = init_logging(options.clone()) {
        eprintln!("mashti: logging disabled: {error:#}");
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(options),
        Command::Seed => commands::seed::run(options),
        Command::Smoke => commands::smoke::run(options),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(options) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(options, json) }
        }
        Command::Enrich { name, category, price, popular } => {
            commands::enrich::run(commands::enrich::EnrichRequest {
                name,
                category,
                price,
                popular,
            })
        }
        Command::Recommend(args) => commands::recommend::run(options, args.into()),
        Command::Walk { steps } => commands::walk::run(options, &steps),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the stderr subscriber described by the `[logging]` section.
fn init_logging(options: LoadOptions) -> anyhow::Result<()> {
    let logging = match AppConfig::load(options) {
        Ok(config) => config.logging,
        // Commands report configuration errors themselves.
        Err(_) => LoggingConfig { level: "warn".to_string(), format: LogFormat::Compact },
    };
    let level = logging
        .level
        .parse::<Level>()
        .with_context(|| format!("unsupported log level `{}`", logging.level))?;

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr);
    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow::anyhow!("installing tracing subscriber: {error}"))
}
