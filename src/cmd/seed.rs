use crate::cmd::read_input;
use crate::reports;
use clap::Args;
use runeforge::analysis::seed_key;
use runeforge::cipher;
use runeforge::config::Config;
use runeforge::scorer::Scorer;
use runeforge::stream;
use runeforge::RfResult;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[command(flatten)]
    pub config: Config,

    /// Document to analyse (`-` for stdin)
    pub input: PathBuf,

    #[arg(short, long)]
    pub period: usize,
}

pub fn run(args: SeedArgs, config: &Config, scorer: &Scorer) -> RfResult<()> {
    let text = read_input(&args.input)?;
    let extraction = stream::extract_document(&text);
    let expected = config.analysis.get_expected_symbol()?;

    let mut rows = Vec::new();
    for op in config.analysis.get_operations()? {
        let key = seed_key(&extraction.symbols, args.period, op, expected)?;
        let plain = cipher::transform(&extraction.symbols, &key, op)?;
        rows.push(reports::SeedRow {
            operation: op,
            fitness: scorer.score(&plain),
            key,
        });
    }

    println!("\n🌱 Seeds for period {} (assuming '{}')", args.period, expected);
    reports::print_seed_table(&rows);
    Ok(())
}
