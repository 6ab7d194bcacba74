use crate::cmd::read_input;
use crate::reports;
use clap::Args;
use runeforge::alphabet;
use runeforge::api;
use runeforge::cipher::Operation;
use runeforge::config::Config;
use runeforge::scorer::Scorer;
use runeforge::RfResult;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub config: Config,

    /// Document to decrypt (`-` for stdin)
    pub input: PathBuf,

    /// Integers ("3,7,12") or a transliterated keyword ("DIUINITY")
    #[arg(short, long)]
    pub key: String,

    #[arg(short, long, value_enum, default_value_t = Operation::Subtractive)]
    pub operation: Operation,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: DecryptArgs, scorer: &Scorer) -> RfResult<()> {
    let text = read_input(&args.input)?;
    let key = alphabet::parse_key(&args.key)?;
    let solution = api::decrypt_with_key(&text, &key, args.operation, scorer)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }
    reports::print_solution(&solution);
    Ok(())
}
