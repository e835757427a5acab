use anyhow::Result;
use clap::Parser;
use silence_cut::{app, cli};

fn main() -> Result<()> {
    let args = cli::SplitArgs::parse();
    app::init_logging(args.debug);
    app::run_split(args)
}
