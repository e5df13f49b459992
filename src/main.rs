//! Command line front end: parse a generator graph, print or render it.

use arachne::{prelude::*, wav};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arachne")]
#[command(about = "Sample accurate signal generator graphs", long_about = None)]
struct Cli {
    /// Sampling rate in Hz
    #[arg(long, default_value = "44100", global = true)]
    sr: u32,

    /// Seed for random generators
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a graph and print its samples, or write them to a WAV file
    Render {
        /// Generator text, e.g. "WaveSine{rate{2}{frequency}}"
        graph: String,

        /// Number of samples
        #[arg(short = 'n', long, default_value = "16")]
        samples: usize,

        /// Output WAV file path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the normalized text of a graph
    Show {
        graph: String,

        /// Write constants as bare values
        #[arg(short, long)]
        compact: bool,
    },
    /// List generator kinds and their parameters
    Kinds,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::new();
    config.sampling_rate(cli.sr);
    if let Some(seed) = cli.seed {
        config.seed(seed);
    }
    let env = Environment::new(&config)?;
    let factory = Factory::new(&env);

    match cli.command {
        Commands::Render { graph, samples, out } => {
            let root = factory.create(&graph)?;
            let mut root = root.borrow_mut();
            let frames = root.render_poly(samples);
            match out {
                Some(path) => {
                    let channels = root.poly_depth().max(1);
                    let mut table = Vec::with_capacity(samples * channels);
                    for frame in &frames {
                        for d in 0..channels {
                            table.push(frame.get(d).copied().unwrap_or(0.0));
                        }
                    }
                    wav::write_table(&path, channels as u16, cli.sr, &table)?;
                    println!("wrote {} frames to {}", samples, path.display());
                }
                None => {
                    for (i, frame) in frames.iter().enumerate() {
                        let values: Vec<String> = frame.iter().map(|v| v.to_string()).collect();
                        println!("{}\t{}", i, values.join("\t"));
                    }
                }
            }
        }
        Commands::Show { graph, compact } => {
            let root = factory.create(&graph)?;
            println!("{}", root.borrow().to_text(compact));
        }
        Commands::Kinds => {
            for kind in GeneratorKind::ALL.iter() {
                let params: Vec<&str> = kind.slots().iter().map(|s| s.name.as_str()).collect();
                println!("{:>2} {:<16} {}", kind.id(), kind.name(), params.join(", "));
            }
        }
    }
    Ok(())
}
