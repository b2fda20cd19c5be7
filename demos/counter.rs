//! Counts `0..10` on a hot source, adds ten, keeps the even results and
//! prints every signal.
//!
//! Usage: `cargo run --example counter -- [INTERVAL_MS]` (default 1000).
use std::time::Duration;

use clap::Parser;
use pushrx::prelude::*;

#[derive(Parser)]
#[command(name = "counter")]
#[command(about = "Hot counter piped through map(+10) and filter(even)", long_about = None)]
struct Cli {
  /// Delay after each value, in milliseconds
  #[arg(default_value = "1000")]
  interval_ms: u64,
}

fn main() -> Result<(), SourceError> {
  tracing_subscriber::fmt::init();
  let cli = Cli::parse();

  let counter = HotSource::<String>::new(10, Pacing::every(Duration::from_millis(cli.interval_ms)));
  Pipeline::from(counter.clone()).map(|v| v + 10).filter(|v| v % 2 == 0).subscribe(
    observer::fns(
      |v: i64| println!("{v}"),
      |err: String| println!("error {err}"),
      || println!("complete"),
    ),
  )?;

  counter.start(&NewThread::named("counter"))?.wait()
}
