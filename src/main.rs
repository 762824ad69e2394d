use std::error::Error;
use std::path::PathBuf;
use yycrain::YycRain;

/// Fetches the Calgary rainfall feeds, aggregates them per quadrant, and
/// writes the interactive map. Takes the boundary file and output path as
/// optional positional arguments.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let boundary_file = args
        .next()
        .unwrap_or_else(|| "City_Quadrants.geojson".to_owned());
    let output = args.next().unwrap_or_else(|| "rainfall_map.html".to_owned());

    let client = YycRain::new(&boundary_file).await?;
    let written = client
        .render_map()
        .output(PathBuf::from(output))
        .call()
        .await?;

    println!("Map written to {}", written.display());
    Ok(())
}
