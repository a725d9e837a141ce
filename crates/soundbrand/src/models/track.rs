//! Track records and the recommendation bundle.

use serde::{Deserialize, Serialize};

/// Where a track record originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    Spotify,
    AudioNetwork,
    ExtremeMusic,
    EpidemicSound,
    Artlist,
    Musicbed,
    IndieDb,
    MockLibrary,
    Commercial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocalCategory {
    Male,
    Female,
    Mixed,
    Instrumental,
}

/// Licensing route a track would be cleared through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackRoute {
    Commercial,
    Library,
    Indie,
    Bespoke,
    KnownArtist,
}

/// A track, either straight from the catalog or enriched by ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique within the catalog, e.g. `t3`.
    pub id: String,
    pub title: String,
    pub artist: String,
    pub source: TrackSource,
    /// Preview audio link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    pub bpm: u32,
    /// 0.0 to 1.0
    pub energy: f32,
    /// 0.0 to 1.0
    pub valence: f32,
    pub mood_tags: Vec<String>,
    pub instrumentation_tags: Vec<String>,
    pub vocal: VocalCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyric_summary: Option<String>,
    /// Fit against the sonic brief, 0.0 to 1.0. Only set on ranked tracks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_fit_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_reasons: Option<Vec<String>>,
    pub route: TrackRoute,
    pub exclusive: bool,
    /// `m:ss`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform: Option<Vec<f32>>,
}

impl Track {
    /// Score as a percentage for display, if the track was ranked.
    #[must_use]
    pub fn score_percent(&self) -> Option<u32> {
        self.sync_fit_score.map(|s| (s.clamp(0.0, 1.0) * 100.0).round() as u32)
    }
}

/// Reduced view of a catalog track sent to the model for ranking.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateTrack<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub artist: &'a str,
    pub tags: &'a [String],
}

impl<'a> From<&'a Track> for CandidateTrack<'a> {
    fn from(track: &'a Track) -> Self {
        Self {
            id: &track.id,
            title: &track.title,
            artist: &track.artist,
            tags: &track.mood_tags,
        }
    }
}

/// Ranked tracks grouped by bucket.
///
/// Only `commercial` is filled by the pipeline; `library` and `indie` stay
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackRecommendations {
    pub commercial: Vec<Track>,
    #[serde(default)]
    pub library: Vec<Track>,
    #[serde(default)]
    pub indie: Vec<Track>,
}

impl TrackRecommendations {
    #[must_use]
    pub fn commercial_only(commercial: Vec<Track>) -> Self {
        Self {
            commercial,
            library: Vec::new(),
            indie: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commercial.len() + self.library.len() + self.indie.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
