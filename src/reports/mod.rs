use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use itertools::Itertools;
use runeforge::alphabet::{self, Key};
use runeforge::analysis::PeriodScore;
use runeforge::api::Solution;
use runeforge::cipher::Operation;
use runeforge::consts::RANDOM_BASELINE;

pub struct SeedRow {
    pub operation: Operation,
    pub key: Key,
    pub fitness: f32,
}

fn key_values(key: &Key) -> String {
    key.iter().map(|s| s.value()).join(",")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_period_table(ranking: &[PeriodScore], top: usize) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Period").add_attribute(Attribute::Bold),
        Cell::new("IoC").fg(Color::Cyan),
        Cell::new("vs random"),
    ]);
    for i in 0..4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (rank, p) in ranking.iter().enumerate() {
        let mut period = Cell::new(p.period);
        if rank < top {
            period = period.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        let ioc = if p.is_language_like() {
            Cell::new(format!("{:.3}", p.ioc)).fg(Color::Green)
        } else {
            Cell::new(format!("{:.3}", p.ioc))
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            period,
            ioc,
            Cell::new(format!("{:+.3}", p.ioc - RANDOM_BASELINE)),
        ]);
    }
    println!("{}", table);
}

pub fn print_seed_table(rows: &[SeedRow]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Operation").add_attribute(Attribute::Bold),
        Cell::new("Key"),
        Cell::new("Values"),
        Cell::new("Fitness").fg(Color::Cyan),
    ]);
    if let Some(col) = table.column_mut(3) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for r in rows {
        table.add_row(vec![
            Cell::new(r.operation),
            Cell::new(alphabet::decode(&r.key)),
            Cell::new(key_values(&r.key)),
            Cell::new(format!("{:.2}", r.fitness)),
        ]);
    }
    println!("{}", table);
}

pub fn print_solution(s: &Solution) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Period").add_attribute(Attribute::Bold),
        Cell::new(s.period),
    ]);
    table.add_row(vec![
        Cell::new("Operation").add_attribute(Attribute::Bold),
        Cell::new(s.operation),
    ]);
    table.add_row(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new(format!("{} [{}]", s.key_text, key_values(&s.key))).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Key runes").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} (gematria {})",
            alphabet::to_runes(&s.key),
            alphabet::gematria_sum(&s.key)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Fitness").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{:.2} (bigram {:.2}, lexicon {:.2})",
            s.fitness, s.details.bigram, s.details.lexicon
        ))
        .fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Pairs").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} known / {} unseen",
            s.details.pairs_seen, s.details.pairs_unseen
        )),
    ]);
    if s.runs > 0 {
        table.add_row(vec![
            Cell::new("Runs").add_attribute(Attribute::Bold),
            Cell::new(format!("{} (seed {})", s.runs, s.seed.unwrap_or_default())),
        ]);
    }
    println!("\n{}", table);

    if !s.details.matched_words.is_empty() {
        let words: Vec<String> = s
            .details
            .matched_words
            .iter()
            .take(15)
            .map(|(w, n)| if *n > 1 { format!("{}x{}", w, n) } else { w.clone() })
            .collect();
        println!("Lexicon hits: {}", words.join(" "));
    }

    println!("\n--- Plaintext ---\n{}", s.plaintext);
    println!("\n--- Rendered ---\n{}", s.rendered);
}
