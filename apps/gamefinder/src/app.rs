//! Runs one discovery request and renders the result as JSON.

use std::io::Write;

use gamefinder_steam::{StoreHandler, SteamHandler};
use regex::Regex;
use serde::Serialize;

/// What the user asked for on the command line.
#[derive(Debug, Default)]
pub enum Request {
    /// Every installed game.
    #[default]
    All,
    /// The first installed game among these AppIds.
    AppIds(Vec<u32>),
    /// The first installed game whose name matches.
    Name(Regex),
    /// Whether Steam can be located at all.
    Check,
}

#[derive(Debug, Serialize)]
struct Availability {
    store: &'static str,
    available: bool,
}

/// Executes `request` and writes pretty JSON to `out`.
///
/// Discovery failures are returned as `GameFinderError` inside the
/// `anyhow::Error` so the caller can report the error code.
pub async fn run(handler: &SteamHandler, request: &Request, out: &mut impl Write) -> anyhow::Result<()> {
    match request {
        Request::All => {
            let games = handler.find_all_games().await?;
            write_json(out, &games)?;
        }
        Request::AppIds(ids) => {
            let game = handler.find_by_app_id(ids).await?;
            write_json(out, &game)?;
        }
        Request::Name(pattern) => {
            let game = handler.find_by_name(pattern).await?;
            write_json(out, &game)?;
        }
        Request::Check => {
            let report = Availability {
                store: handler.store_id(),
                available: handler.is_available().await,
            };
            write_json(out, &report)?;
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
