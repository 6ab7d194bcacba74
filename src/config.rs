use crate::alphabet::{self, Key, Symbol};
use crate::cipher::Operation;
use crate::consts::{DEFAULT_ITERATIONS, DEFAULT_RESTART_THRESHOLD};
use crate::error::{RfResult, RuneForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub weights: ScoringWeights,
    #[command(flatten)]
    pub analysis: AnalysisParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,
    #[arg(long, default_value_t = DEFAULT_RESTART_THRESHOLD)]
    pub restart_threshold: usize,
    // Share of mutations that nudge by +-1/+-2 instead of resampling
    #[arg(long, default_value_t = 0.7)]
    pub perturb_probability: f32,
    #[arg(long, default_value_t = 4)]
    pub runs_per_config: usize,
    // 0 = one worker per core
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
    #[arg(long)]
    pub max_seconds: Option<u64>,
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            restart_threshold: DEFAULT_RESTART_THRESHOLD,
            perturb_probability: 0.7,
            runs_per_config: 4,
            threads: 0,
            max_seconds: None,
            seed: None,
        }
    }
}

impl SearchParams {
    pub fn merge_from_cli(&mut self, cli_params: &SearchParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_params.$field.clone();
                }
            };
        }

        update_if_present!(iterations, "iterations");
        update_if_present!(restart_threshold, "restart_threshold");
        update_if_present!(perturb_probability, "perturb_probability");
        update_if_present!(runs_per_config, "runs_per_config");
        update_if_present!(threads, "threads");
        update_if_present!(max_seconds, "max_seconds");
        update_if_present!(seed, "seed");
    }

    pub fn max_time(&self) -> Option<Duration> {
        self.max_seconds.map(Duration::from_secs)
    }

    pub fn validate(&self) -> RfResult<()> {
        if !(0.0..=1.0).contains(&self.perturb_probability) {
            return Err(RuneForgeError::Config(format!(
                "perturb_probability must be within [0, 1], got {}",
                self.perturb_probability
            )));
        }
        if self.restart_threshold == 0 {
            return Err(RuneForgeError::Config(
                "restart_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    #[arg(long, default_value_t = -3.5, allow_negative_numbers = true)]
    pub unseen_bigram_weight: f32,
    #[arg(long, default_value_t = 1.0)]
    pub bigram_scale: f32,
    #[arg(long, default_value_t = 1.0)]
    pub lexicon_scale: f32,
    // Weight per letter for lexicon lines without an explicit weight
    #[arg(long, default_value_t = 1.5)]
    pub lexicon_length_bonus: f32,
    #[arg(long, default_value_t = 3)]
    pub lexicon_min_len: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            unseen_bigram_weight: -3.5,
            bigram_scale: 1.0,
            lexicon_scale: 1.0,
            lexicon_length_bonus: 1.5,
            lexicon_min_len: 3,
        }
    }
}

impl ScoringWeights {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Lays explicitly-typed CLI flags over values loaded from a file.
    pub fn merge_from_cli(&mut self, cli_weights: &ScoringWeights, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_weights.$field.clone();
                }
            };
        }

        update_if_present!(unseen_bigram_weight, "unseen_bigram_weight");
        update_if_present!(bigram_scale, "bigram_scale");
        update_if_present!(lexicon_scale, "lexicon_scale");
        update_if_present!(lexicon_length_bonus, "lexicon_length_bonus");
        update_if_present!(lexicon_min_len, "lexicon_min_len");
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    #[arg(long, default_value_t = 20)]
    pub max_period: usize,
    #[arg(long, default_value_t = 3)]
    pub top_periods: usize,
    #[arg(long, default_value = "additive,subtractive,beaufort")]
    pub operations: String,
    // Transliteration of the plaintext symbol assumed most frequent
    #[arg(long, default_value = "E")]
    pub expected_symbol: String,
    // Keyword guess ("DIUINITY" or "3,7,12"); fixes the period and starts run 0
    #[arg(long)]
    pub initial_key: Option<String>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            max_period: 20,
            top_periods: 3,
            operations: "additive,subtractive,beaufort".to_string(),
            expected_symbol: "E".to_string(),
            initial_key: None,
        }
    }
}

impl AnalysisParams {
    pub fn merge_from_cli(&mut self, cli_params: &AnalysisParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_params.$field.clone();
                }
            };
        }

        update_if_present!(max_period, "max_period");
        update_if_present!(top_periods, "top_periods");
        update_if_present!(operations, "operations");
        update_if_present!(expected_symbol, "expected_symbol");
        update_if_present!(initial_key, "initial_key");
    }

    pub fn get_operations(&self) -> RfResult<Vec<Operation>> {
        let ops = self
            .operations
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Operation>()
                    .map_err(|_| RuneForgeError::Config(format!("Unknown operation '{}'", s)))
            })
            .collect::<RfResult<Vec<_>>>()?;

        if ops.is_empty() {
            return Err(RuneForgeError::Config("No operations configured".to_string()));
        }
        Ok(ops)
    }

    pub fn get_initial_key(&self) -> RfResult<Option<Key>> {
        self.initial_key.as_deref().map(alphabet::parse_key).transpose()
    }

    pub fn get_expected_symbol(&self) -> RfResult<Symbol> {
        match alphabet::encode(&self.expected_symbol).as_slice() {
            [s] => Ok(*s),
            _ => Err(RuneForgeError::Config(format!(
                "expected_symbol '{}' is not a single glyph",
                self.expected_symbol
            ))),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Flags typed on the command line win over a loaded config file.
    pub fn merge_from_cli(&mut self, cli_config: &Config, matches: &ArgMatches) {
        self.search.merge_from_cli(&cli_config.search, matches);
        self.weights.merge_from_cli(&cli_config.weights, matches);
        self.analysis.merge_from_cli(&cli_config.analysis, matches);
    }
}
