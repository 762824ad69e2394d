//! Fetches the rainfall feeds, aggregates per quadrant, and writes the
//! interactive choropleth to `rainfall_map.html`.

use std::path::PathBuf;
use yycrain::{YycRain, YycRainError};

#[tokio::main]
async fn main() -> Result<(), YycRainError> {
    env_logger::init();

    let client = YycRain::new("City_Quadrants.geojson").await?;

    let written = client
        .render_map()
        .output(PathBuf::from("rainfall_map.html"))
        .title("Historical Rainfall Data Analysis for The City of Calgary".to_owned())
        .call()
        .await?;

    println!("Open {} in a browser and slide to a year.", written.display());
    Ok(())
}
