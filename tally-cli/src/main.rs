use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::UNCATEGORIZED;
use tally_finance::{CategoryRules, NormalizeOptions, Normalizer, PaymentPolicy};

use crate::config::Config;
use crate::output::{OutputFormat, WriteMode};
use crate::summary_cmd::SummaryFormat;

mod config;
mod logging;
mod output;
mod state;
mod statements;
mod summary_cmd;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = LONG_VERSION,
    about = "Normalize and categorize bank statement CSV exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize statement CSVs into one canonical transaction table
    Normalize {
        /// Statement exports (only allowed extensions are read)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (default: config output.path, else stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Append rows instead of overwriting (CSV only)
        #[arg(long)]
        append: bool,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// drop | income
        #[arg(long)]
        payment_policy: Option<PaymentPolicy>,
    },

    /// Show the auto-category the keyword rules give a description
    Categorize {
        description: String,

        /// Bank-supplied category to seed with
        #[arg(long)]
        bank_category: Option<String>,
    },

    /// List the keyword rules in the order they are applied
    Rules,

    /// Spending per category and daily expense totals of a processed CSV
    Summary {
        /// Canonical CSV written by `tally normalize`
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = SummaryFormat::Table)]
        format: SummaryFormat,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init_logging(&cfg.log.filter);

    match cli.command {
        Command::Normalize {
            files,
            out,
            append,
            format,
            payment_policy,
        } => {
            let normalizer = Normalizer::new(NormalizeOptions {
                payment_policy: payment_policy.unwrap_or(cfg.normalize.payment_policy),
            });
            let mode = if append {
                WriteMode::Append
            } else {
                cfg.output.write_mode
            };
            let format = format.unwrap_or(cfg.output.format);
            run_normalize(&cfg, &files, out, format, mode, &normalizer)?;
        }

        Command::Categorize {
            description,
            bank_category,
        } => {
            let seed = bank_category.as_deref().unwrap_or(UNCATEGORIZED);
            let result = CategoryRules::standard().categorize(&description, seed);
            if result.needs_review {
                println!("{} (needs review)", result.category);
            } else {
                println!("{}", result.category);
            }
        }

        Command::Rules => {
            for (i, rule) in CategoryRules::standard().rules().iter().enumerate() {
                let review = if rule.flags_review() { " (needs review)" } else { "" };
                let keywords: Vec<_> = rule.keywords().collect();
                println!("{}. {}{}: {}", i + 1, rule.label(), review, keywords.join(", "));
            }
        }

        Command::Summary { file, format } => summary_cmd::run_summary(&file, format)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => print!("{}", toml::to_string_pretty(&cfg)?),
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

fn run_normalize(
    cfg: &Config,
    files: &[PathBuf],
    out: Option<PathBuf>,
    format: OutputFormat,
    mode: WriteMode,
    normalizer: &Normalizer,
) -> Result<()> {
    let loaded = statements::load_statements(files, &cfg.ingest.allowed_extensions, normalizer)?;
    let dest = out.or_else(|| cfg.output.path());

    output::write_table(&loaded.table, dest.as_deref(), format, mode)?;

    eprintln!(
        "Normalized {} transactions from {} file(s); {} need review",
        loaded.table.len(),
        loaded.files,
        loaded.table.review_count()
    );
    Ok(())
}
