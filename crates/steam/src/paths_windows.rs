//! Steam root candidates on Windows.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

const REGISTRY_KEY: &str = r"HKCU\Software\Valve\Steam";
const REGISTRY_VALUE: &str = "SteamPath";

/// Returns `%ProgramFiles(x86)%\Steam`.
pub(crate) fn default_candidates(program_files_x86: Option<OsString>) -> Vec<PathBuf> {
    let base = program_files_x86
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"));
    vec![base.join("Steam")]
}

/// Reads `HKCU\Software\Valve\Steam\SteamPath` through `reg query`.
///
/// Returns `None` if the query fails, the value is absent, or the process
/// does not finish within `timeout`.
pub(crate) async fn registry_steam_path(timeout: Duration) -> Option<PathBuf> {
    let query = tokio::process::Command::new("reg")
        .args(["query", REGISTRY_KEY, "/v", REGISTRY_VALUE])
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(timeout, query).await {
        Ok(Ok(output)) if output.status.success() => {
            parse_reg_query_output(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(Ok(output)) => {
            debug!(status = %output.status, "registry query returned non-zero");
            None
        }
        Ok(Err(e)) => {
            debug!(error = %e, "failed to run reg query");
            None
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "registry query timed out");
            None
        }
    }
}

/// Matches a line shaped like `SteamPath    REG_SZ    c:/...`.
static REG_SZ_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*SteamPath[ \t]+REG_SZ[ \t]+(\S.*?)\s*$").expect("valid reg query pattern")
});

/// Extracts the `SteamPath` value from `reg query` output.
pub(crate) fn parse_reg_query_output(stdout: &str) -> Option<PathBuf> {
    REG_SZ_LINE
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| PathBuf::from(m.as_str()))
}
