/// XOR demo for xornet.
///
/// Architecture: 2 → 4 (Sigmoid) → 2 (Sigmoid) → 1 (Identity)
/// Training:     online backpropagation, lr = 0.1, eps = 1e-7, 100000 epochs
///
/// Run with:
///   cargo run --release -- [--config run.json] [--seed N] [--json]
///
/// Log verbosity follows RUST_LOG (default `info`).

use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use xornet::{xor_samples, EpochSnapshot, LayerKind, LayerSnapshot, NetError, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "xornet")]
#[command(about = "Train a small MLP on XOR with online backpropagation")]
struct Args {
    /// JSON run configuration (network, training, seed)
    #[arg(short, long)]
    config: Option<String>,

    /// Weight initialization seed; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print snapshots as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

/// Text rendering of one layer, one line per neuron.
fn render_layer(layer: &LayerSnapshot) -> String {
    let title = match layer.kind {
        LayerKind::Input => "Input",
        LayerKind::Hidden => "Hidden",
        LayerKind::Output => "Output",
    };
    let mut out = format!(
        "{title} layer ({}), inputs: {}, outputs: {}\n",
        layer.activation, layer.input_size, layer.output_size
    );
    for (i, row) in layer.weights.iter().enumerate() {
        out.push_str(&format!(
            "  neuron {i}: inputs {:?}, weights {:?}, out {:.6}\n",
            layer.inputs, row, layer.outputs[i]
        ));
    }
    out
}

fn print_snapshot(snapshot: &EpochSnapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(%e, "failed to encode snapshot"),
        }
        return;
    }
    for layer in &snapshot.layers {
        print!("{}", render_layer(layer));
    }
    println!("Error: {}", snapshot.error);
    println!("Epoch: {}\n", snapshot.epoch);
}

fn run(args: Args) -> Result<(), NetError> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load_json(path)?,
        None => RunConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut network = config.network.build(&mut rng)?;

    // The demo data is XOR; a config with other dimensions is rejected by `train`.
    let samples = xor_samples();
    let json = args.json;
    let mut observer = |snapshot: &EpochSnapshot| print_snapshot(snapshot, json);
    let outcome = network.train(&samples, &config.training, &mut observer)?;

    println!(
        "Finished after {} epochs with error {:e} ({:?})",
        outcome.epochs, outcome.error, outcome.status
    );

    for sample in &samples {
        let result = network.inference(&sample.input)?;
        println!("{} XOR {} = {}", sample.input[0], sample.input[1], result[0]);
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
