use clap::Parser;
use log::{debug, error};
use mandelbrot_field::{grid, options::Options, window, Error, Evaluator};

fn run(options: Options) -> Result<(), Error> {
    let config = options.config();
    debug!("using {:?} on {} workers", config, options.workers);

    let evaluator = Evaluator::new(config)?;
    let pool = grid::worker_pool(options.workers)?;
    window::run(evaluator, pool)?;
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(error) = run(Options::parse()) {
        error!("{}", error);
        std::process::exit(1);
    }
}
