use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use runeforge::cipher;
use runeforge::config::{Config, ScoringWeights};
use runeforge::scorer::{ScorerBuildParams, Scorer};
use runeforge::RfResult;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Period and key recovery for the runic substitution cipher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bigram counts (PAIR<TAB>COUNT); embedded English when omitted
    #[arg(global = true, short, long)]
    bigrams: Option<PathBuf>,

    /// Lexicon (WORD[<TAB>WEIGHT]); embedded English when omitted
    #[arg(global = true, short, long)]
    lexicon: Option<PathBuf>,

    /// JSON config (search, weights, analysis); explicit flags still win
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// JSON scoring-weight profile, applied over --config; explicit flags still win
    #[arg(global = true, long)]
    weights: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank candidate key lengths by Index of Coincidence
    Periods(cmd::periods::PeriodsArgs),
    /// Frequency-seeded starting keys for one period
    Seed(cmd::seed::SeedArgs),
    /// Full pipeline: periods, seeds, parallel search
    Crack(cmd::crack::CrackArgs),
    /// Apply a known key
    Decrypt(cmd::decrypt::DecryptArgs),
}

impl Commands {
    fn config(&self) -> &Config {
        match self {
            Commands::Periods(a) => &a.config,
            Commands::Seed(a) => &a.config,
            Commands::Crack(a) => &a.config,
            Commands::Decrypt(a) => &a.config,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Commands::Periods(_) => "periods",
            Commands::Seed(_) => "seed",
            Commands::Crack(_) => "crack",
            Commands::Decrypt(_) => "decrypt",
        }
    }
}

fn fatal(e: impl std::fmt::Display) -> ! {
    error!("❌ {}", e);
    process::exit(1);
}

fn resolve_config(cli: &Cli, matches: &ArgMatches) -> RfResult<Config> {
    let cli_config = cli.command.config();
    let sub_matches = matches.subcommand_matches(cli.command.name());

    let mut config = match &cli.config {
        Some(path) => {
            info!("⚙️  Loading Config from: {}", path.display());
            let mut file_config = Config::load_from_file(path)?;
            if let Some(m) = sub_matches {
                file_config.merge_from_cli(cli_config, m);
            }
            file_config
        }
        None => cli_config.clone(),
    };

    if let Some(path) = &cli.weights {
        info!("⚖️  Loading Weights from: {}", path.display());
        let mut file_weights = ScoringWeights::load_from_file(path)?;
        if let Some(m) = sub_matches {
            file_weights.merge_from_cli(&cli_config.weights, m);
        }
        config.weights = file_weights;
    }
    Ok(config)
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cipher::verify_round_trip() {
        fatal(e);
    }

    let config = resolve_config(&cli, &matches).unwrap_or_else(|e| fatal(e));

    if cli.bigrams.is_none() && cli.lexicon.is_none() {
        info!("📚 Using embedded English language model");
    }
    let scorer: Arc<Scorer> = match ScorerBuildParams::load_from_disk(
        cli.bigrams.as_ref(),
        cli.lexicon.as_ref(),
        Some(config.weights.clone()),
    ) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("❌ FATAL ERROR INITIALIZING SCORER:");
            fatal(e);
        }
    };
    if scorer.lexicon.is_empty() && !scorer.has_letters {
        warn!("⚠️  Lexicon is empty; fitness uses bigrams only");
    }

    let result = match cli.command {
        Commands::Periods(args) => cmd::periods::run(args, &config),
        Commands::Seed(args) => cmd::seed::run(args, &config, &scorer),
        Commands::Crack(args) => cmd::crack::run(args, &config, scorer),
        Commands::Decrypt(args) => cmd::decrypt::run(args, &scorer),
    };

    if let Err(e) = result {
        fatal(e);
    }
}
