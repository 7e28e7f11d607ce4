use anyhow::Context;
use itertools::Itertools;
use log::warn;
use scraper::{ElementRef, Html};

use crate::{config::SiteConfig, schema::Episode};

/// Collects the teaser links of a listing page in document order.
pub fn parse_episode_list(html: &Html, site: &SiteConfig) -> anyhow::Result<Vec<Episode>> {
    html.select(selector!("div.teaserpadding > h2 > a"))
        .map(|a| parse_teaser_link(a, site))
        .try_collect()
}

fn parse_teaser_link(a: ElementRef, site: &SiteConfig) -> anyhow::Result<Episode> {
    let title = a.text().collect::<String>().trim().to_owned();
    let href = a
        .attr("href")
        .with_context(|| format!("Teaser link {title:?} has no href"))?;
    if title.is_empty() {
        warn!("Teaser link to {href:?} has no text");
    }
    Ok(Episode::builder()
        .title(title)
        .url(site.absolute_url(href))
        .build())
}
