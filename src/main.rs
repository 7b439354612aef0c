use std::process;
use clap::Parser;
use factoradic::error::InvalidInputError;
use factoradic::input::parse_permutation;
use factoradic::lehmer::{permutation_to_factoradic, factoradic_to_index};

/// Prints the Lehmer code (factoradic digits) of a permutation.
#[derive(Parser, Debug)]
struct Cli {
    /// Distinct integers separated by commas or whitespace, e.g. "(4, 0, 6, 2, 1, 3, 5)".
    #[arg(name = "permutation", index(1), default_value = "2,0,1", allow_hyphen_values = true)]
    permutation: String,
    /// Also print the permutation's lexicographic index.
    #[arg(name = "index", long, short)]
    index: bool,
}

fn run(cli: &Cli) -> Result<(), InvalidInputError> {
    let permutation = parse_permutation(&cli.permutation)?;
    log::info!("read permutation of length {}", permutation.len());

    let digits = permutation_to_factoradic(&permutation)?;
    println!("{:?}", digits);
    if cli.index {
        println!("index: {}", factoradic_to_index(&digits)?);
    }
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
