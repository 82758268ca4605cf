use chrono::NaiveDate;

use fundflow::analysis::{DataError, StructuralDataSource};
use fundflow::config::Config;
use fundflow::indicators::enrich;
use fundflow::logging::init_logging;
use fundflow::models::{Bar, HolderPosition, HoldingsSnapshot, ShareholderCount};
use fundflow::scanner::{ScanInput, ScanReport, Scanner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = Config::default();
    let scanner = Scanner::new(&config);

    let mut accumulation = accumulation_breakout_history();
    enrich(&mut accumulation, &config.indicators);
    let report = scanner.scan(&ScanInput {
        ticker: "DEMO-ACC",
        bars: &accumulation,
        benchmark: None,
        structural: Some(&DemoDisclosures),
    });
    print_report(&report);
    println!();

    let mut decline = heavy_decline_history();
    enrich(&mut decline, &config.indicators);
    let report = scanner.scan(&ScanInput {
        ticker: "DEMO-DST",
        bars: &decline,
        benchmark: None,
        structural: None,
    });
    print_report(&report);

    Ok(())
}

fn print_report(report: &ScanReport) {
    println!("Ticker: {}", report.ticker);
    println!(
        "  Score: {} ({})",
        report.result.total_score, report.result.rating
    );
    println!("  {}", report.result.recommendation);
    println!("  Signals:");
    for (i, weighted) in report.signals.iter().enumerate() {
        println!(
            "    {}. {} (weight {:+}): {}",
            i + 1,
            weighted.signal.name,
            weighted.weight,
            weighted.signal.description
        );
    }
    if report.signals.is_empty() {
        println!("    (none)");
    }
}

/// Canned disclosure data: one fund entered the top holders and the
/// shareholder base concentrated.
struct DemoDisclosures;

impl StructuralDataSource for DemoDisclosures {
    fn institutional_holdings(&self, _ticker: &str) -> Result<Vec<HoldingsSnapshot>, DataError> {
        let entrant = HolderPosition {
            holder_name: "Example Capital".to_string(),
            hold_ratio: 0.048,
            hold_amount: 4_800_000.0,
        };
        Ok(vec![
            HoldingsSnapshot { end_date: day(90), positions: vec![entrant] },
            HoldingsSnapshot { end_date: day(0), positions: Vec::new() },
        ])
    }

    fn shareholder_counts(&self, _ticker: &str) -> Result<Vec<ShareholderCount>, DataError> {
        Ok(vec![
            ShareholderCount { end_date: day(90), holder_num: 41_000 },
            ShareholderCount { end_date: day(0), holder_num: 52_000 },
        ])
    }
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).and_then(|d| d.checked_add_days(chrono::Days::new(offset)))
        .unwrap_or(NaiveDate::MIN)
}

/// Sixty days of tight consolidation around 10.0 followed by a high-volume
/// push to the top of the range.
fn accumulation_breakout_history() -> Vec<Bar> {
    let mut bars = Vec::new();
    for i in 0..55u64 {
        let close = 10.0 + 0.3 * ((i % 7) as f64 / 7.0);
        bars.push(Bar::new(day(i), close, close + 0.1, close - 0.1, close, 1_000_000.0));
    }
    for i in 55..60u64 {
        let close = 10.3 + 0.05 * (i - 55) as f64;
        bars.push(Bar::new(
            day(i),
            close - 0.05,
            close + 0.02,
            close - 0.1,
            close,
            2_600_000.0,
        ));
    }
    bars
}

/// A steady uptrend that ends in a heavy-volume slide through support.
fn heavy_decline_history() -> Vec<Bar> {
    let mut bars = Vec::new();
    for i in 0..57u64 {
        let close = 10.0 + 0.05 * i as f64;
        bars.push(Bar::new(day(i), close, close + 0.1, close - 0.1, close, 1_000_000.0));
    }
    let mut close = 12.8;
    for i in 57..60u64 {
        close *= 0.95;
        bars.push(Bar::new(
            day(i),
            close * 1.04,
            close * 1.05,
            close * 0.99,
            close,
            3_200_000.0,
        ));
    }
    bars
}
