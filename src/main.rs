use anyhow::Result;
use clap::Parser;
use streambank::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    streambank::logging::init(cli.verbose);
    cli.run().await
}
