use std::{fs::File, path::PathBuf, time::Duration};

use log::{LevelFilter, info};
use structopt::StructOpt;
use tours::{log::build_logger_for_verbosity, prelude::*, utils::signal_handling};

#[derive(StructOpt, Default)]
pub enum Commands {
    /// Branch and bound with matrix reduction (default)
    #[default]
    Bnb,
    /// Enumerate all tours; only feasible for tiny instances
    Naive,
}

#[derive(StructOpt)]
struct Opts {
    /// Instance file; reads from stdin if omitted
    #[structopt(short, long)]
    instance: Option<PathBuf>,

    /// Output file; writes to stdout if omitted
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Give up after this many seconds
    #[structopt(short = "T", long, parse(try_from_str = parse_timeout))]
    timeout: Option<Duration>,

    /// Write the tour as JSON
    #[structopt(long)]
    json: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,

    #[structopt(subcommand)]
    cmd: Option<Commands>,
}

fn load_matrix(path: &Option<PathBuf>) -> anyhow::Result<CostMatrix> {
    if let Some(path) = path {
        Ok(CostMatrix::try_read_matrix_file(path)?)
    } else {
        let stdin = std::io::stdin().lock();
        Ok(CostMatrix::try_read_matrix(stdin)?)
    }
}

fn write_tour<W: std::io::Write>(tour: &Tour, json: bool, mut writer: W) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut writer, tour)?;
        writeln!(writer)?;
        Ok(())
    } else {
        tour.write(writer)
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);
    signal_handling::initialize();

    let mut matrix = load_matrix(&opts.instance)?;
    info!(
        "Loaded instance with {} destinations",
        matrix.number_of_destinations()
    );

    let tour = match opts.cmd.unwrap_or_default() {
        Commands::Bnb => {
            let mut algo = BranchAndBound::new(&mut matrix);
            if let Some(timeout) = opts.timeout {
                algo.set_timeout(timeout);
            }
            algo.run()?
        }
        Commands::Naive => naive_solver(&matrix)?,
    };

    if let Some(path) = &opts.output {
        let writer = std::io::BufWriter::new(File::create(path)?);
        write_tour(&tour, opts.json, writer)?;
    } else {
        write_tour(&tour, opts.json, std::io::stdout().lock())?;
    }

    Ok(())
}
