use anyhow::Result;
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = medq::Config::load(cli.config.as_deref())?;
    let filter = if cli.verbose { "debug" } else { config.log_filter.as_str() };
    medq::logging::init(filter)?;
    cli::run(cli, config).await
}
