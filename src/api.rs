use anyhow::bail;
use getset::Getters;
use log::{debug, info};
use reqwest::IntoUrl;
use scraper::Html;

use crate::{
    audio_parser::parse_show_audio,
    config::SiteConfig,
    episode_list_parser::parse_episode_list,
    episode_page_parser::parse_episode_page,
    schema::{Episode, ShowAudio},
};

#[derive(Getters)]
pub struct NdrClient {
    client: reqwest::Client,
    #[getset(get = "pub")]
    site: SiteConfig,
}

impl NdrClient {
    pub fn new(site: SiteConfig) -> anyhow::Result<Self> {
        let client = reqwest_client(&site)?;
        Ok(Self { client, site })
    }

    /// GETs `url` and returns the body, failing on any non-2xx status.
    pub async fn fetch_text(&self, url: impl IntoUrl) -> anyhow::Result<String> {
        let request = self.client.get(url).build()?;
        info!("Fetching {}", request.url());
        let response = self.client.execute(request).await?;
        if !response.status().is_success() {
            bail!(
                "Unexpected error code: server returned {:?} for {}",
                response.status(),
                response.url()
            );
        }
        Ok(response.text().await?)
    }

    pub async fn fetch_html(&self, url: impl IntoUrl) -> anyhow::Result<Html> {
        Ok(Html::parse_document(&self.fetch_text(url).await?))
    }

    /// `listing_url` may be absolute or relative to the site origin.
    pub async fn scrape_episodes(&self, listing_url: &str) -> anyhow::Result<Vec<Episode>> {
        let url = self.site.absolute_url(listing_url);
        let html = self.fetch_html(url).await?;
        let episodes = parse_episode_list(&html, &self.site)?;
        info!("Found {} teaser links", episodes.len());
        Ok(episodes)
    }

    pub async fn fetch_show_audio(&self, url: impl IntoUrl) -> anyhow::Result<ShowAudio> {
        parse_show_audio(&self.fetch_text(url).await?)
    }

    /// Follows an episode page to its audio API and builds the record.
    ///
    /// If the page has no inline script or none of them assigns the API URL,
    /// the returned error is an [`crate::episode_page_parser::PageError`].
    pub async fn scrape_audio(&self, page_url: &str) -> anyhow::Result<ShowAudio> {
        let html = self.fetch_html(self.site.absolute_url(page_url)).await?;
        let page = parse_episode_page(&html, &self.site)?;
        debug!("Retrieving JSON from: {}", page.api_url());
        self.fetch_show_audio(page.api_url().clone()).await
    }
}

fn reqwest_client(site: &SiteConfig) -> reqwest::Result<reqwest::Client> {
    let builder = reqwest::Client::builder().connection_verbose(true);
    match site.user_agent() {
        Some(user_agent) => builder.user_agent(user_agent.as_str()),
        None => builder,
    }
    .build()
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::NdrClient;
    use crate::{config::SiteConfig, episode_page_parser::PageError};

    const LISTING: &str = r#"<html><body>
        <div class="teaserpadding"><h2><a href="/kultur/neo-am-19052024,audio1641990.html">NDR Kultur Neo am 19.05.2024</a></h2></div>
        <div class="teaserpadding"><h2><a href="https://example.com/elsewhere.html">Elsewhere</a></h2></div>
        </body></html>"#;

    const EPISODE_PAGE: &str = r#"<html><head>
        <script type="text/javascript">
            var apiUrl = '/kultur/audio1641990-podlove.json',
            playerType = 'external_embed',
        </script>
        </head><body></body></html>"#;

    const AUDIO_JSON: &str = r#"{
        "audio": [{"title": "NDR Kultur Neo am 19.05.2024"}],
        "duration": "01:58:00",
        "link": "https://www.ndr.de/kultur/neo-am-19052024,audio1641990.html",
        "files": [{"url": "https://example.com/neo.mp3", "size": "113246208"}],
        "chapters": [{"start": "00:00:00.000", "title": "Intro"}],
        "publicationDate": "2024-05-19",
        "poster": "https://example.com/poster.jpg"
    }"#;

    fn client_for(server: &MockServer) -> NdrClient {
        let site: SiteConfig =
            toml::from_str(&format!("base_url = {:?}", server.uri())).unwrap();
        NdrClient::new(site).unwrap()
    }

    async fn serve(server: &MockServer, at: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn client_keeps_site_config() {
        let site: SiteConfig = toml::from_str(
            r#"
            base_url = "http://localhost:8080"
            user_agent = "Mozilla/5.0"
            "#,
        )
        .unwrap();
        let client = NdrClient::new(site).unwrap();
        assert_eq!(client.site().base_url().as_str(), "http://localhost:8080/");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.html"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let client = client_for(&server);
        let err = client
            .fetch_text(format!("{}/gone.html", server.uri()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"), "{err}");
        assert!(client.scrape_episodes("/gone.html").await.is_err());
    }

    #[tokio::test]
    async fn episodes_from_relative_listing_url() {
        let server = MockServer::start().await;
        serve(&server, "/kultur/sendungen/neo/index.html", LISTING).await;
        let client = client_for(&server);

        let episodes = client
            .scrape_episodes("/kultur/sendungen/neo/index.html")
            .await
            .unwrap();
        let episodes = episodes
            .iter()
            .map(|e| (e.title().clone(), e.url().clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            episodes,
            [
                (
                    "NDR Kultur Neo am 19.05.2024".to_owned(),
                    format!("{}/kultur/neo-am-19052024,audio1641990.html", server.uri())
                ),
                (
                    "Elsewhere".to_owned(),
                    "https://example.com/elsewhere.html".to_owned()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn audio_from_episode_page() {
        let server = MockServer::start().await;
        serve(&server, "/kultur/neo-am-19052024,audio1641990.html", EPISODE_PAGE).await;
        serve(&server, "/kultur/audio1641990-podlove.json", AUDIO_JSON).await;
        let client = client_for(&server);

        let audio = client
            .scrape_audio("/kultur/neo-am-19052024,audio1641990.html")
            .await
            .unwrap();
        assert_eq!(audio.title(), "NDR Kultur Neo am 19.05.2024");
        assert_eq!(audio.audio_url(), "https://example.com/neo.mp3");
        assert_eq!(audio.audio_size_bytes(), 113_246_208);
        assert_eq!(audio.chapters().len(), 1);
        assert_eq!(audio.publication_date(), "2024-05-19");
    }

    #[tokio::test]
    async fn missing_api_url_stays_recognizable() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/kultur/broken.html",
            r#"<script type="text/javascript">var trackingConfig = {};</script>"#,
        )
        .await;
        let client = client_for(&server);

        let err = client.scrape_audio("/kultur/broken.html").await.unwrap_err();
        let page_error = err.downcast_ref::<PageError>().unwrap();
        assert!(matches!(page_error, PageError::ApiUrlNotFound { .. }));
        assert!(page_error.is_structural_absence());
    }

    #[tokio::test]
    async fn failing_audio_api_is_not_structural_absence() {
        let server = MockServer::start().await;
        serve(&server, "/kultur/neo-am-19052024,audio1641990.html", EPISODE_PAGE).await;
        let client = client_for(&server);

        let err = client
            .scrape_audio("/kultur/neo-am-19052024,audio1641990.html")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<PageError>().is_none());
    }
}
