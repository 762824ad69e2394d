//! Demonstrates collecting the aggregated quadrant totals directly into
//! Rust structs.

use yycrain::{YycRain, YycRainError};

#[tokio::main]
async fn main() -> Result<(), YycRainError> {
    env_logger::init();

    let client = YycRain::new("City_Quadrants.geojson").await?;

    // --- Totals for a single year ---
    println!("\n--- Quadrant totals for 1995 ---");
    let totals_1995 = client.quadrant_totals().await?.for_year(1995).collect_totals()?;
    for total in &totals_1995 {
        println!("{:?}", total);
    }

    // --- Full aggregated table, lazily filtered to a decade ---
    println!("\n--- 1990s totals ---");
    let decade = client
        .quadrant_totals()
        .await?
        .year_range(1990, 1999)
        .frame
        .collect()?;
    println!("{}", decade);

    Ok(())
}
