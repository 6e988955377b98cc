use switchyard::cli::run_cli;
use switchyard::logging::{self, LogConfig};

fn main() -> anyhow::Result<()> {
    if let Err(err) = logging::init(&LogConfig::from_env()) {
        eprintln!("warning: {err:#}");
    }
    run_cli()
}
