use std::env;
use yycrain::{YycRain, YycRainError};

#[tokio::main]
async fn main() -> Result<(), YycRainError> {
    env_logger::init();
    configure_polars_display();

    let client = YycRain::new("City_Quadrants.geojson").await?;

    let readings = client.readings().await?.collect()?;
    println!("{} raw rainfall readings:\n{}", readings.height(), readings);

    let gauges = client.gauges().await?.collect()?;
    println!("{} gauges:\n{}", gauges.height(), gauges);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
