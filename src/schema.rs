use std::fmt;

use derive_more::{Display, From, FromStr, Into};
use getset::{CopyGetters, Getters};
use itertools::Itertools;
use num_format::{Locale, WriteFormatted};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use typed_builder::TypedBuilder;

/// One teaser of a listing page.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, Serialize)]
#[getset(get = "pub")]
pub struct Episode {
    title: String,
    url: String,
}
impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "* {} ({})", self.title, self.url)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, Serialize)]
#[getset(get = "pub")]
pub struct Chapter {
    /// Offset into the audio as the site writes it, e.g. `00:12:34.000`
    start: String,
    title: String,
}
impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.title)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, CopyGetters, Serialize)]
pub struct ShowAudio {
    #[getset(get = "pub")]
    title: String,
    #[getset(get = "pub")]
    duration: String,
    #[getset(get = "pub")]
    page_url: String,
    #[getset(get = "pub")]
    audio_url: String,
    #[getset(get_copy = "pub")]
    audio_size_bytes: u64,
    #[getset(get = "pub")]
    chapters: Vec<Chapter>,
    #[getset(get = "pub")]
    publication_date: String,
    #[getset(get = "pub")]
    poster_url: String,
}
impl ShowAudio {
    pub fn audio_megabytes(&self) -> Megabytes {
        Megabytes(self.audio_size_bytes as f64 / (1024 * 1024) as f64)
    }

    pub fn chapter_list(&self) -> String {
        self.chapters
            .iter()
            .map(|chapter| format!("* {chapter}"))
            .join("\n")
    }
}
impl fmt::Display for ShowAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title (duration): {} ({})", self.title, self.duration)?;
        writeln!(
            f,
            "Audio URL (size):  {} ({} MB)",
            self.audio_url,
            self.audio_megabytes()
        )?;
        write!(f, "{} chapters:\n{}", self.chapters.len(), self.chapter_list())
    }
}

#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, From, Into, Serialize)]
pub struct Megabytes(f64);
impl fmt::Display for Megabytes {
    fn fmt(&self, mut f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = (self.0 * 100.0).round() as u64;
        match f.write_formatted(&(hundredths / 100), &Locale::en) {
            Ok(_) => write!(f, ".{:02}", hundredths % 100),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Numeric content id of the site, as in `audio1641990`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, From, Into, FromStr, Display, Serialize)]
#[display("audio{_0}")]
pub struct SophoraId(u32);

/// Response of the per-episode audio API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioApiResponse {
    pub audio: Vec<AudioEntry>,
    pub duration: String,
    /// URL of the episode page
    pub link: String,
    pub files: Vec<AudioFile>,
    #[serde(default)]
    pub chapters: Vec<ChapterEntry>,
    pub publication_date: String,
    pub poster: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioEntry {
    pub title: String,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AudioFile {
    pub url: String,
    /// In bytes.  Usually a string, occasionally a number.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChapterEntry {
    pub start: String,
    pub title: String,
}
