use anyhow::Context;
use clap::Parser;
use shellfish_cleaner::cli::{run, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("shellfish-cleaner failed")
}
