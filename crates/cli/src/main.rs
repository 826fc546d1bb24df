mod cli;
mod commands;
mod errors;
mod logging;

use crate::cli::parse;
use crate::commands::Command;
use crate::logging::TracingConfig;
use tracing::instrument;

fn main() -> miette::Result<()> {
    let cli = parse();

    logging::init_tracing(TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
    })?;

    let settings = cli.settings.clone();
    run(settings.as_deref(), cli.command.into())
}

#[instrument(name = "baw_cache_main", skip(command))]
fn run(settings: Option<&std::path::Path>, command: Command) -> miette::Result<()> {
    let caches = commands::load_settings(settings)?.build()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(&command, &caches, &mut out)?;
    Ok(())
}
