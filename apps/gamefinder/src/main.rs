//! gamefinder: lists installed Steam games as JSON.

mod app;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gamefinder_steam::{GameFinderError, SteamHandler};
use regex::Regex;
use tracing_subscriber::EnvFilter;

use app::Request;
use config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use this Steam root instead of searching.
    #[arg(long, value_name = "DIR")]
    steam_path: Option<PathBuf>,

    /// Print the first installed game among these AppIds.
    #[arg(long = "app-id", value_name = "ID", conflicts_with_all = ["name", "check"])]
    app_ids: Vec<u32>,

    /// Print the first installed game whose full name matches REGEX.
    #[arg(long, value_name = "REGEX", conflicts_with = "check")]
    name: Option<Regex>,

    /// Only report whether Steam is available.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn request(&self) -> Request {
        if self.check {
            Request::Check
        } else if let Some(name) = &self.name {
            Request::Name(name.clone())
        } else if !self.app_ids.is_empty() {
            Request::AppIds(self.app_ids.clone())
        } else {
            Request::All
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = &cli.steam_path {
        config.discovery.steam_path = Some(path.clone());
    }

    // Logs go to stderr; stdout carries the JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match execute(config, cli.request()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<GameFinderError>() {
                Some(discovery) => eprintln!("error: {}: {discovery}", discovery.code()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn execute(config: Config, request: Request) -> anyhow::Result<()> {
    tracing::debug!(?request, discovery = ?config.discovery, "starting discovery");
    let handler = SteamHandler::with_config(config.discovery);
    let rt = tokio::runtime::Runtime::new()?;
    let mut stdout = std::io::stdout().lock();
    rt.block_on(app::run(&handler, &request, &mut stdout))
}
