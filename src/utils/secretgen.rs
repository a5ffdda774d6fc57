use clap::Parser;
use jwt_debugger::common::signer::generate_secret;
use jwt_debugger::common::token::Algorithm;
use rand::rngs::OsRng;

/// Prints a random HMAC secret sized for the chosen algorithm.
#[derive(Debug, Parser)]
#[command(name = "secretgen", version)]
struct Args {
    /// HS256, HS384 or HS512
    #[arg(long, default_value = "HS256", value_parser = parse_algorithm)]
    algorithm: Algorithm,
}

fn parse_algorithm(name: &str) -> Result<Algorithm, String> {
    name.parse()
        .map_err(|alg| format!("unsupported algorithm {}, expected HS256, HS384 or HS512", alg))
}

fn main() {
    let args = Args::parse();
    println!("{}", generate_secret(args.algorithm, &mut OsRng));
}
