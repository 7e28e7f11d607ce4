use getset::Getters;
use log::debug;
use scraper::Html;
use thiserror::Error;
use url::Url;

use crate::{
    config::SiteConfig,
    embedded_script::{extract_api_url, extract_config_json, ScriptError},
    schema::SophoraId,
};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to find first JavaScript element with URL to audio-JSON `var apiUrl = '/kultur/audio*.json`.")]
    NoInlineScript,
    #[error("Failed to extract URL to audio-JSON from script, line with `var apiUrl = '/kultur/`. Script beginning with {script_head:?}. Aborting.")]
    ApiUrlNotFound { script_head: String },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PageError {
    /// Whether the page simply lacks what we are looking for,
    /// as opposed to containing something broken.
    pub fn is_structural_absence(&self) -> bool {
        matches!(self, Self::NoInlineScript | Self::ApiUrlNotFound { .. })
    }
}

/// The Podlove player container, `<div id="audioplayer-audio<sophora id><uuid>">`.
#[derive(Clone, PartialEq, Eq, Debug, Getters)]
#[getset(get = "pub")]
pub struct PlayerElement {
    sophora_id: SophoraId,
    instance_id: String,
}

#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct EpisodePage {
    api_url: Url,
    /// Decoded `basicPianoJSON`, if the page has one.  Nothing reads it yet.
    player_config: Option<serde_json::Value>,
    player: Option<PlayerElement>,
}

/// Text of every inline (no `src`) JavaScript element, in document order.
pub fn inline_scripts(html: &Html) -> Vec<String> {
    html.select(selector!(r#"script[type="text/javascript"]:not([src])"#))
        .map(|script| script.text().collect())
        .collect()
}

pub fn find_player(html: &Html) -> Option<PlayerElement> {
    html.select(selector!(r#"div[id^="audioplayer-audio"]"#))
        .find_map(|div| {
            let captures = regex!(
                r"^audioplayer-audio(\d{7})([a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12})$"
            )
            .captures(div.attr("id")?)?;
            Some(PlayerElement {
                sophora_id: captures[1].parse().ok()?,
                instance_id: captures[2].to_owned(),
            })
        })
}

pub fn parse_episode_page(html: &Html, site: &SiteConfig) -> Result<EpisodePage, PageError> {
    let scripts = inline_scripts(html);
    debug!("Found {} scripts without src.", scripts.len());
    let first = scripts.first().ok_or(PageError::NoInlineScript)?;

    let mut api_url = None;
    for script in &scripts {
        if let Some(url) = extract_api_url(script, site)? {
            api_url = Some(url);
            break;
        }
    }
    let api_url = api_url.ok_or_else(|| PageError::ApiUrlNotFound {
        script_head: first.chars().take(20).collect(),
    })?;

    let mut player_config = None;
    for script in &scripts {
        if let Some(config) = extract_config_json(script)? {
            player_config = Some(config);
            break;
        }
    }

    let player = find_player(html);
    debug!("Player element: {player:?}");

    Ok(EpisodePage {
        api_url,
        player_config,
        player,
    })
}
