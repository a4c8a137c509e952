use std::path::PathBuf;
use std::process;

use clap::Parser;
use monopoly_core::cli::load_snapshot;
use monopoly_core::{Engine, EngineConfig};

#[derive(Debug, Parser, Clone)]
#[command(name = "decide")]
#[command(about = "Prints the Monopoly decision engine's calls for a snapshot fixture")]
struct Args {
    /// Path to a JSON-encoded GameSnapshot fixture.
    snapshot: PathBuf,

    /// Player index to decide for.
    #[arg(long, default_value_t = 0)]
    player: usize,

    /// Square being landed on, for the buy/bid decisions.
    #[arg(long)]
    square: Option<u8>,

    /// Listed purchase price of `--square`, required with `--square`.
    #[arg(long)]
    price: Option<i64>,

    /// Current leading auction bid, for the bid decision.
    #[arg(long, default_value_t = 0)]
    current_bid: i64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let snapshot = match load_snapshot(&args.snapshot) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let engine = match Engine::new(EngineConfig::default()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let (Some(square), Some(price)) = (args.square, args.price) {
        match engine.should_buy(&snapshot, square, price, args.player) {
            Ok(decision) => println!("shouldBuy({square}, ${price}) = {decision}"),
            Err(e) => eprintln!("Error: {e}"),
        }
        match engine.bid(&snapshot, square, price, args.current_bid, args.player) {
            Ok(decision) => println!("bid({square}, ${price}, current=${}) = {decision:?}", args.current_bid),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    match engine.build(&snapshot, args.player) {
        Ok(steps) => println!("build() = {steps:?}"),
        Err(e) => eprintln!("Error: {e}"),
    }

    match engine.unmortgage_idle(&snapshot, args.player) {
        Ok(squares) => println!("unmortgageIdle() = {squares:?}"),
        Err(e) => eprintln!("Error: {e}"),
    }

    match engine.determine_jail_policy(&snapshot, args.player) {
        Ok(policy) => println!("jailPolicy() = {policy:?}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
