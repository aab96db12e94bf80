mod config;
mod flags;
mod highlight;
mod render;

use tcdoc::error::Result;

use crate::config::Config;
use crate::flags::{Tcdoc, TcdocCmd};

/// The environment variable holding a log filter, e.g. `tcdoc=debug`.
pub const LOG_ENV: &str = "TCDOC_LOG";

fn init_logging(verbose: u32) {
    use tracing_subscriber::EnvFilter;

    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(flags: Tcdoc) -> Result<()> {
    let config = Config::discover(flags.config.as_deref())?;
    match &flags.subcommand {
        TcdocCmd::Highlight(cmd) => config.highlight(cmd),
        TcdocCmd::Tokens(cmd) => config.tokens(cmd),
        TcdocCmd::Render(cmd) => config.render(cmd),
        TcdocCmd::Style(cmd) => config.style(cmd),
        TcdocCmd::Settings(_) => config.show_settings(),
    }
}

pub fn main() {
    let flags = Tcdoc::from_env_or_exit();
    init_logging(flags.verbose);

    if let Err(e) = run(flags) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
