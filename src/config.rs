use std::{fmt::Debug, path::Path};

use anyhow::Context;
use getset::Getters;
use log::info;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.ndr.de";
pub const DEFAULT_LISTING_PATH: &str = "/kultur/sendungen/neo/index.html";
pub const DEFAULT_EPISODE_URL: &str =
    "https://www.ndr.de/kultur/NDR-Kultur-Neo-am-19052024-mit-Hendrik-Haubold,audio1641990.html";

/// Where the site lives and which pages the commands look at by default.
///
/// Every key is optional in the TOML file; missing ones keep their default.
#[derive(Clone, Debug, Getters, Deserialize)]
#[serde(default)]
#[getset(get = "pub")]
pub struct SiteConfig {
    base_url: Url,
    listing_path: String,
    episode_url: String,
    user_agent: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            listing_path: DEFAULT_LISTING_PATH.to_owned(),
            episode_url: DEFAULT_EPISODE_URL.to_owned(),
            user_agent: None,
        }
    }
}

impl SiteConfig {
    pub fn load<P: AsRef<Path> + Debug>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        (|| toml::from_str(&fs_err::read_to_string(path)?).map_err(anyhow::Error::new))()
            .with_context(|| format!("While trying to parse {path:?} as site config"))
    }

    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                info!("Loading site config from {path:?}");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Site-relative links (starting with `/`) get the origin prepended,
    /// everything else is returned as is.
    pub fn absolute_url(&self, link: &str) -> String {
        if link.starts_with('/') {
            format!("{}{}", self.base_url.origin().ascii_serialization(), link)
        } else {
            link.to_owned()
        }
    }

    pub fn join_api_path(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Failed to resolve {path:?} against {}", self.base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::SiteConfig;

    #[test]
    fn relative_links_get_the_origin() {
        let site = SiteConfig::default();
        assert_eq!(
            site.absolute_url("/kultur/sendungen/neo/index.html"),
            "https://www.ndr.de/kultur/sendungen/neo/index.html"
        );
        assert_eq!(
            site.absolute_url("https://example.com/x.html"),
            "https://example.com/x.html"
        );
        assert_eq!(site.absolute_url("x.html"), "x.html");
    }

    #[test]
    fn api_paths_are_joined_to_the_origin() {
        let site = SiteConfig::default();
        assert_eq!(
            site.join_api_path("/kultur/foo.json").unwrap().as_str(),
            "https://www.ndr.de/kultur/foo.json"
        );
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let site: SiteConfig = toml::from_str(r#"base_url = "http://localhost:8080""#).unwrap();
        assert_eq!(site.base_url().as_str(), "http://localhost:8080/");
        assert_eq!(site.listing_path(), super::DEFAULT_LISTING_PATH);
        assert_eq!(site.episode_url(), super::DEFAULT_EPISODE_URL);
        assert_eq!(site.user_agent(), &None);
        assert_eq!(site.absolute_url("/a.html"), "http://localhost:8080/a.html");
    }

    #[test]
    fn empty_file_is_the_default_config() {
        let site: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(site.base_url().as_str(), "https://www.ndr.de/");
    }
}
