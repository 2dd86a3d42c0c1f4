//! Rankings example for covid-core
//!
//! Top countries per metric, folded name search and a day-by-day comparison.

use covid_core::prelude::*;

fn main() -> Result<()> {
    let db = CovidDb::with_default_data();

    for metric in [Metric::Confirmed, Metric::Deaths, Metric::NewConfirmed] {
        println!("--- Top 3 by {metric} ---");
        for (i, stats) in db.top_countries(metric, 3)?.iter().enumerate() {
            println!("{}. {:<20} {}", i + 1, stats.name, stats.metric(metric));
        }
        println!();
    }

    println!("--- Search \"ko\" ---");
    println!("{:?}\n", db.search_countries("ko")?);

    println!("--- Italy vs China, confirmed ---");
    for row in db.compare_countries(&["Italy", "China"], DatasetKind::Confirmed)? {
        println!("{} {:?}", row.date, row.values);
    }

    println!("\n--- Day-over-day change (Global) ---");
    let global = db.get_global_data()?;
    let previous = global.confirmed - global.new_confirmed;
    println!(
        "{} -> {} ({})",
        previous,
        global.confirmed,
        format_change_percentage(global.confirmed, previous)
    );

    Ok(())
}
