use anyhow::Result;
use clap::Parser;
use silence_cut::{app, cli};

fn main() -> Result<()> {
    let args = cli::TrimArgs::parse();
    app::init_logging(args.debug);
    app::run_trim(args)
}
