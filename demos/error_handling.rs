//! Error handling example for covid-core
//!
//! This example demonstrates how lookup and load failures surface.

use covid_core::prelude::*;

fn main() -> Result<()> {
    println!("=== covid-core Error Handling Example ===\n");

    println!("--- Example 1: Loading from a missing directory ---");
    let missing = CovidDb::from_config(LoaderConfig::default().with_dir("/nonexistent/covid"));
    match missing.list_countries() {
        Ok(names) => println!("  Unexpectedly loaded {} countries", names.len()),
        Err(e) if e.is_load_failure() => println!("  Load failure: {e}"),
        Err(e) => return Err(e),
    }
    println!("  Cache still cold: {}", !missing.cache().is_loaded());
    println!();

    let db = CovidDb::with_default_data();

    println!("--- Example 2: Unknown countries ---");
    for name in ["Atlantis", "", "Narnia"] {
        match db.get_country_data(name) {
            Ok(stats) => println!("  Found: {}", stats.name),
            Err(e) if e.is_not_found() => println!("  {e}"),
            Err(e) => return Err(e),
        }
    }
    println!();

    println!("--- Example 3: Malformed CSV ---");
    let bad = "Province/State,Country/Region,Lat,Long,1/22/20\n,Nowhere,0,0,abc\n";
    let broken = CovidDb::new(StaticCsvSource::new(bad, bad, bad));
    match broken.get_global_data() {
        Ok(stats) => println!("  Unexpectedly aggregated {} cases", stats.confirmed),
        Err(e) => println!("  Aggregation failed: {e}"),
    }

    Ok(())
}
