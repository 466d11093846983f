use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use maiconv::simai::ChartJson;

#[derive(Parser, Debug)]
#[command(name = "maiconv")]
#[command(version = "0.1.0")]
#[command(about = "Simai to ma2 chart converter", long_about = None)]
struct Args {
    /// Output ma2 file
    output: PathBuf,

    /// Input chart JSON (reads from stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Ticks per measure in the output
    #[arg(short, long, default_value_t = maiconv::ma2::DEFAULT_RESOLUTION)]
    resolution: i32,
}

fn main() -> Result<(), maiconv::Error> {
    env_logger::init();
    let args = Args::parse();

    let chart: ChartJson = match &args.input {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => serde_json::from_reader(std::io::stdin().lock())?,
    };

    let simai = chart.into_chart()?;
    let ma2 = maiconv::simai_to_ma2(&simai)?;
    std::fs::write(&args.output, ma2.export(args.resolution)?)?;

    Ok(())
}
