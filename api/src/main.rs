use std::sync::Arc;

use clap::Parser;

use crate::{
    application::{client::command::run_analyze, http::server::http_server::serve, logging},
    args::{Cli, Command},
};

mod application;
mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init_tracing(&cli.log)?;

    match cli.command {
        Command::Serve(args) => serve(Arc::new(args)).await,
        Command::Analyze(args) => run_analyze(args).await,
    }
}
