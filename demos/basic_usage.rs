//! Basic usage example for covid-core
//!
//! This example demonstrates how to:
//! - Load the bundled sample time series
//! - List canonical countries
//! - Query one country by raw or canonical name
//! - Build map markers

use covid_core::prelude::*;

fn main() -> Result<()> {
    println!("=== covid-core Basic Usage Example ===\n");

    let db = CovidDb::with_default_data();

    println!("--- Example 1: List all countries ---");
    let countries = db.list_countries()?;
    println!("Total countries: {}", countries.len());
    for (i, name) in countries.iter().take(5).enumerate() {
        println!("{}. {}", i + 1, name);
    }
    println!();

    println!("--- Example 2: World totals ---");
    let global = db.get_global_data()?;
    println!(
        "Confirmed: {} (+{}), deaths: {} (+{}), active: {}",
        global.confirmed, global.new_confirmed, global.deaths, global.new_deaths, global.active
    );
    println!();

    // "US" is the raw dataset name, "United States" the canonical one.
    println!("--- Example 3: One country ---");
    for name in ["US", "United States"] {
        let stats = db.get_country_data(name)?;
        println!("{name} -> {}: {} confirmed", stats.name, stats.confirmed);
    }
    let italy = db.get_country_data("Italy")?;
    let series = &italy.timeseries.confirmed;
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!(
            "Italy grew from {} on {} to {} on {}",
            first.value, first.date, last.value, last.date
        );
    }
    println!();

    println!("--- Example 4: Markers ---");
    for marker in db.get_all_countries_stats()?.iter().take(5) {
        println!(
            "{:<20} ({:>8.3}, {:>8.3}) confirmed={}",
            marker.country, marker.lat, marker.long, marker.confirmed
        );
    }

    Ok(())
}
