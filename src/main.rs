use clap::Parser;

use offscreen_cube::{args::Args, flow, logging, DemoConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log.as_deref());

    let config = DemoConfig::from(args);
    log::debug!("{config:?}");
    flow::run(config)
}
