use profile_scanner_lib::config::{DEFAULT_PAGES, MAX_PAGES, MIN_PAGES};
use profile_scanner_lib::{export, logger};
use profile_scanner_lib::{DelayPolicy, ModeInput, Pipeline, ResultRow, ScanConfig, ScanMode, ScanStatus};

use anyhow::Context;
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::Path;

fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Blank means the default; anything else is clamped into range.
fn parse_pages(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(n) => n.clamp(MIN_PAGES as i64, MAX_PAGES as i64) as u32,
        Err(_) => DEFAULT_PAGES,
    }
}

fn read_config(input: &mut impl BufRead) -> anyhow::Result<ScanConfig> {
    println!("Scan mode:");
    println!("  1) Trainer / Mentor / Consultant scanner");
    println!("  2) LinkedIn profile search");
    let choice = prompt(input, "Choose [1]")?;

    let api_key = prompt(input, "Google API Key")?;
    let engine_id = prompt(input, "Custom Search Engine ID")?;

    let mode = if choice == "2" {
        ModeInput::Profile {
            keywords: prompt(input, "Search Keywords (e.g., data engineer)")?,
        }
    } else {
        ModeInput::Trainer {
            technology: prompt(input, "Main Technology / Skill (e.g., Python, Java, Power BI)")?,
            related_tools: prompt(input, "Related Frameworks / Tools (comma-separated, optional)")?,
            location: prompt(input, "Location (Optional, e.g., India)")?,
        }
    };

    let pages = prompt(
        input,
        &format!("Max Pages to Scan ({}-{}) [{}]", MIN_PAGES, MAX_PAGES, DEFAULT_PAGES),
    )?;

    Ok(ScanConfig {
        api_key,
        engine_id,
        mode,
        max_pages: parse_pages(&pages),
        delay: DelayPolicy::default(),
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn print_table(rows: &[ResultRow]) {
    println!(
        "{:>3} | {:<32} | {:<40} | {:<30} | {:<20}",
        "#", "Name", "Profile URL", "Emails Found", "Phones Found"
    );
    println!("{}", "-".repeat(140));

    for (i, r) in rows.iter().enumerate() {
        println!(
            "{:>3} | {:<32} | {:<40} | {:<30} | {:<20}",
            i + 1,
            truncate(&r.name, 32),
            truncate(&r.profile_url, 40),
            truncate(&r.contacts.emails_joined(), 30),
            truncate(&r.contacts.phones_joined(), 20),
        );
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let config = read_config(&mut input)?;

    let scan = match config.validate() {
        Ok(scan) => scan,
        Err(e) => {
            warn!("{}", e);
            println!("{}", e);
            return Ok(());
        }
    };

    let pipeline = Pipeline::from_scan(&scan).context("failed to set up the search client")?;
    println!("Searching for: {}", pipeline.query());

    let outcome = pipeline.run();
    if let Some(e) = &outcome.search_error {
        println!("{}", e);
    }

    if outcome.rows.is_empty() {
        println!("No relevant profiles found.");
        return Ok(());
    }

    let noun = match pipeline.mode() {
        ScanMode::Trainer { .. } => "relevant profiles",
        ScanMode::Profile { .. } => "profiles",
    };
    println!("Found {} {}!", outcome.rows.len(), noun);
    print_table(&outcome.rows);

    let path = export::export_to_file(Path::new("."), pipeline.mode(), &outcome.rows)?;
    println!("\nCSV saved to {}", path.display());

    if outcome.status == ScanStatus::FailedSoftly {
        info!(
            "Search stopped early after {} page(s); partial results were saved.",
            outcome.pages_scanned
        );
    }
    Ok(())
}
