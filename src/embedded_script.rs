//! Pulls configuration out of the inline JavaScript of an episode page.
//!
//! The page does not ship its player configuration as structured data.
//! Instead, one inline script contains something like
//!
//! ```text
//! var apiUrl = '/kultur/audio1641990-podlove_belongsToPodcast-_image-81af8b05-0c64-4249-8fa7-7787cbfdd86f.json',
//!     playerType = 'external_embed',
//!     ...
//! ```
//!
//! and another one declares the player config as a multi-line object literal:
//!
//! ```text
//! var basicPianoJSON =
//! {"a": 1,
//! "b": 2
//! };
//! ```
//!
//! Both are recovered by scanning lines, not by parsing JavaScript.

use thiserror::Error;
use url::Url;

use crate::config::SiteConfig;

pub const API_URL_MARKER: &str = "var apiUrl = '/kultur/";
pub const API_URL_PREFIX: &str = "var apiUrl = '";
pub const CONFIG_MARKER: &str = "var basicPianoJSON";
pub const CONFIG_TERMINATOR: &str = "};";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("`var basicPianoJSON` was found, but no line containing `}};` follows it")]
    UnterminatedConfig,
    #[error("The object assigned to `basicPianoJSON` is not valid JSON: {0}")]
    InvalidConfigJson(#[from] serde_json::Error),
}

/// Returns the relative API path from the first line assigning `apiUrl`.
pub fn extract_api_path(script: &str) -> Option<&str> {
    let line = script.lines().find(|line| line.contains(API_URL_MARKER))?;
    let start = line.find(API_URL_PREFIX)? + API_URL_PREFIX.len();
    Some(
        line[start..]
            .trim_end()
            .trim_end_matches(|c: char| c == '\'' || c == ','),
    )
}

pub fn extract_api_url(script: &str, site: &SiteConfig) -> anyhow::Result<Option<Url>> {
    extract_api_path(script)
        .map(|path| site.join_api_path(path))
        .transpose()
}

/// Decodes the object literal assigned to `basicPianoJSON`.
///
/// The object starts on the line after the declaration and ends at the first
/// following line that contains `};`.  The lines in between, plus a closing
/// brace, form the JSON text.  This only works as long as the payload itself
/// never has `};` on one of its lines; if it does, the object is cut short and
/// decoding fails.
///
/// Returns `Ok(None)` when the script has no such declaration.
pub fn extract_config_json(script: &str) -> Result<Option<serde_json::Value>, ScriptError> {
    let lines: Vec<&str> = script.lines().collect();
    let Some(marker) = lines.iter().position(|line| line.contains(CONFIG_MARKER)) else {
        return Ok(None);
    };
    let begin = marker + 1;
    let end = begin
        + lines[begin..]
            .iter()
            .position(|line| line.contains(CONFIG_TERMINATOR))
            .ok_or(ScriptError::UnterminatedConfig)?;
    let mut json = lines[begin..end].join("\n");
    json.push('}');
    Ok(Some(serde_json::from_str(&json)?))
}
