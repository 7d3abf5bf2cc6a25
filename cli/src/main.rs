//! compfig CLI
//!
//! Generates composite-figure area problems as JSON on stdout.

use clap::Parser;
use compfig_core::{generate, Difficulty, GenConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "compfig")]
#[command(about = "Generate composite-figure area problems")]
struct Args {
    /// Problem difficulty
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,

    /// Seed for reproducible output
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of problems (consecutive seeds starting at --seed)
    #[arg(long, default_value_t = 1)]
    count: u64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let descriptions: Vec<_> = (0..args.count)
        .map(|i| {
            generate(GenConfig {
                difficulty: args.difficulty,
                seed: args.seed + i,
            })
            .description
        })
        .collect();

    let json = if args.pretty {
        serde_json::to_string_pretty(&descriptions)
    } else {
        serde_json::to_string(&descriptions)
    };

    match json {
        Ok(out) => println!("{out}"),
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            std::process::exit(1);
        }
    }
}
