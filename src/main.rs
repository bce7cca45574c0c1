use clap::Parser;

use bdsky::args::Args;
use bdsky::runner::Runner;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut runner = Runner::new(args)?;
    runner.start()
}
