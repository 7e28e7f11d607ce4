use anyhow::Context;

use crate::schema::{AudioApiResponse, Chapter, ShowAudio};

pub fn parse_show_audio(json: &str) -> anyhow::Result<ShowAudio> {
    let response: AudioApiResponse =
        serde_json::from_str(json).context("Failed to decode the audio API response")?;
    response.try_into()
}

impl TryFrom<AudioApiResponse> for ShowAudio {
    type Error = anyhow::Error;

    fn try_from(response: AudioApiResponse) -> anyhow::Result<Self> {
        let title = response
            .audio
            .into_iter()
            .next()
            .context("`audio` is empty")?
            .title;
        let file = response
            .files
            .into_iter()
            .next()
            .context("`files` is empty")?;
        let chapters = response
            .chapters
            .into_iter()
            .map(|chapter| {
                Chapter::builder()
                    .start(chapter.start)
                    .title(chapter.title)
                    .build()
            })
            .collect();
        Ok(ShowAudio::builder()
            .title(title)
            .duration(response.duration)
            .page_url(response.link)
            .audio_url(file.url)
            .audio_size_bytes(file.size)
            .chapters(chapters)
            .publication_date(response.publication_date)
            .poster_url(response.poster)
            .build())
    }
}
