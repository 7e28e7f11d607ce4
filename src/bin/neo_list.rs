use std::path::PathBuf;

use clap::Parser;
use ndr_neo_scraping::{api::NdrClient, config::SiteConfig};

/// Lists the episodes linked from a listing page of the show.
#[derive(Parser)]
struct Opts {
    /// Listing page, absolute or relative to the site origin
    /// [default: the show's index page]
    ndr_index_url: Option<String>,
    /// TOML file overriding the site origin and default pages
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the episodes as a JSON array instead
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let site = SiteConfig::load_or_default(opts.config.as_deref())?;
    let index_url = opts
        .ndr_index_url
        .unwrap_or_else(|| site.listing_path().clone());
    let client = NdrClient::new(site)?;

    if opts.json {
        let episodes = client.scrape_episodes(&index_url).await?;
        println!("{}", serde_json::to_string_pretty(&episodes)?);
        return Ok(());
    }

    println!("Searching for episodes ..");
    let episodes = client.scrape_episodes(&index_url).await?;
    println!("Found {} episodes:", episodes.len());
    for episode in &episodes {
        println!("{episode}");
    }

    Ok(())
}
