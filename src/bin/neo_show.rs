use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ndr_neo_scraping::{
    api::NdrClient, config::SiteConfig, episode_page_parser::PageError, schema::ShowAudio,
};

/// Looks up the audio of a single episode page.
#[derive(Parser)]
struct Opts {
    /// Episode page [default: the episode of 19.05.2024]
    neo_episode_url: Option<String>,
    /// TOML file overriding the site origin and default pages
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    sub: Sub,
}

#[derive(Clone, Subcommand)]
enum Sub {
    /// Prints title, duration, audio URL, size and chapters
    Info(Info),
    /// Prints only the URL of the audio file
    AudioUrl,
}

#[derive(Clone, Args)]
struct Info {
    /// Print the record as JSON instead
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let site = SiteConfig::load_or_default(opts.config.as_deref())?;
    let episode_url = opts
        .neo_episode_url
        .unwrap_or_else(|| site.episode_url().clone());
    let client = NdrClient::new(site)?;

    let audio = scrape_audio_or_exit(&client, &episode_url).await?;
    match opts.sub {
        Sub::Info(Info { json: false }) => println!("{audio}"),
        Sub::Info(Info { json: true }) => println!("{}", serde_json::to_string_pretty(&audio)?),
        Sub::AudioUrl => println!("{}", audio.audio_url()),
    }

    Ok(())
}

/// A page without the expected script is reported on stdout with exit status 1;
/// every other failure is returned.
async fn scrape_audio_or_exit(client: &NdrClient, episode_url: &str) -> anyhow::Result<ShowAudio> {
    let res = client.scrape_audio(episode_url).await;
    if let Err(e) = &res {
        if let Some(page_error) = e
            .downcast_ref::<PageError>()
            .filter(|page_error| page_error.is_structural_absence())
        {
            println!("{page_error}");
            std::process::exit(1);
        }
    }
    res
}
