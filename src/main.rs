use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info, Level};

use ferrite_mlp::{data::Dataset, Network, RunConfig, RunReport};

#[derive(Parser)]
#[command(name = "ferrite-mlp", version, about = "Train a sigmoid MLP on MNIST-style IDX data")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on the IDX files in a data directory and print a JSON report
    Train(TrainArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// JSON run configuration; flags below override its fields
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding the four MNIST IDX files
    #[arg(short, long, value_name = "PATH")]
    data_dir: Option<PathBuf>,
    /// Layer sizes, input first, e.g. 784,30,10
    #[arg(short, long, value_delimiter = ',', value_name = "SIZES")]
    layers: Option<Vec<usize>>,
    #[arg(short, long)]
    epochs: Option<usize>,
    #[arg(short, long, value_name = "INT")]
    batch_size: Option<usize>,
    #[arg(long, value_name = "FLOAT")]
    learning_rate: Option<f64>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    num_classes: Option<usize>,
    /// Compute per-sample gradients of each mini-batch in parallel
    #[arg(long)]
    parallel: bool,
    #[arg(long, value_name = "INT")]
    train_limit: Option<usize>,
    #[arg(long, value_name = "INT")]
    test_limit: Option<usize>,
    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    report: Option<PathBuf>,
}

impl TrainArgs {
    fn overrides(&self) -> RunConfig {
        RunConfig {
            layer_sizes: self.layers.clone(),
            epochs: self.epochs,
            mini_batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            seed: self.seed,
            data_dir: self.data_dir.clone(),
            num_classes: self.num_classes,
            parallel: self.parallel.then_some(true),
            train_limit: self.train_limit,
            test_limit: self.test_limit,
        }
    }
}

fn install_logger(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let installed = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = installed {
        eprintln!("failed to install logger: {e}");
    }
}

fn train(args: TrainArgs) -> ferrite_mlp::Result<()> {
    let start = Instant::now();

    let file_config = match &args.config {
        Some(path) => RunConfig::load_json(path)?,
        None => RunConfig::default(),
    };
    let settings = file_config.merge(args.overrides()).resolve()?;
    info!(?settings, "resolved configuration");

    let mut dataset = Dataset::load(&settings.data_dir, settings.num_classes)?;
    dataset.truncate(settings.train_limit, settings.test_limit);
    let (training, test) = dataset.into_parts();

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut network = Network::new(&settings.layer_sizes, &mut rng)?;
    let test_set = (!test.is_empty()).then_some(test.as_slice());

    let summary = ferrite_mlp::train_loop(
        &mut network,
        &training,
        test_set,
        &settings.train_config(),
        &mut rng,
    )?;

    let report = RunReport::from_summary(&summary, start.elapsed());
    match &args.report {
        Some(path) => {
            report.save_json(path)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_logger(cli.verbose);

    let result = match cli.command {
        Command::Train(args) => train(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
