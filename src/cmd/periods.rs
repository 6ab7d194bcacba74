use crate::cmd::read_input;
use crate::reports;
use clap::Args;
use runeforge::analysis::estimate_periods;
use runeforge::config::Config;
use runeforge::stream;
use runeforge::RfResult;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct PeriodsArgs {
    #[command(flatten)]
    pub config: Config,

    /// Document to analyse (`-` for stdin)
    pub input: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: PeriodsArgs, config: &Config) -> RfResult<()> {
    let text = read_input(&args.input)?;
    let extraction = stream::extract_document(&text);
    let ranking = estimate_periods(&extraction.symbols, config.analysis.max_period);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
        return Ok(());
    }

    println!("\n📏 {} symbols, {} boundaries", extraction.len(), extraction.boundaries.len());
    if ranking.is_empty() {
        println!("Stream too short for period analysis.");
        return Ok(());
    }
    reports::print_period_table(&ranking, config.analysis.top_periods);
    Ok(())
}
