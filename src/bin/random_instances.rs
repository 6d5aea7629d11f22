use std::{fs::File, io::BufWriter, path::PathBuf};

use log::{LevelFilter, info};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use structopt::StructOpt;
use tours::{log::build_logger_for_verbosity, prelude::*};

#[derive(Debug, StructOpt)]
struct Opt {
    /// Number of destinations
    #[structopt(short, long)]
    nodes: NumNodes,

    #[structopt(short, long, default_value = "1234")]
    seed: u64,

    /// Place random points in the plane and use their (symmetric) distances
    #[structopt(short, long)]
    euclidean: bool,

    /// Largest cost of uniform instances; side length of the square for Euclidean ones
    #[structopt(short, long, default_value = "1000")]
    max_cost: u32,

    /// Output file; writes to stdout if omitted
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opt.verbose);
    info!("{opt:?}");

    anyhow::ensure!(
        opt.nodes <= MAX_DESTINATIONS,
        "at most {MAX_DESTINATIONS} destinations are supported"
    );

    let mut rng = Pcg64Mcg::seed_from_u64(opt.seed);
    let matrix = if opt.euclidean {
        CostMatrix::random_euclidean(&mut rng, opt.nodes, opt.max_cost as f64)
    } else {
        CostMatrix::random_uniform(&mut rng, opt.nodes, opt.max_cost)
    };

    if let Some(path) = &opt.output {
        matrix.try_write_matrix(BufWriter::new(File::create(path)?))?;
    } else {
        matrix.try_write_matrix(std::io::stdout().lock())?;
    }

    Ok(())
}
