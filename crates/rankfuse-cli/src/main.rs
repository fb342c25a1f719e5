//! Rankfuse command-line entry point.

use clap::Parser;

mod app;
mod cli;
mod config;
mod corpus;

use app::RankfuseApp;
use cli::CliArgs;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let app = match RankfuseApp::from_args(&args) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = app.run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
