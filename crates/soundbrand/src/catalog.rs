//! Built-in track catalog and hydration of ranked results.
//!
//! The catalog is a fixed list of well-known commercial tracks. Duration,
//! key and waveform are derived from a hash of each track so the catalog
//! is identical on every load.

use serde_json::{Map, Value};
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::{CandidateTrack, Track, TrackRoute, TrackSource, VocalCategory};

/// Number of samples in a derived waveform.
pub const WAVEFORM_SAMPLES: usize = 40;

const KEYS: [&str; 14] = [
    "C", "Cm", "D", "Dm", "E", "Em", "F", "Fm", "G", "Gm", "A", "Am", "B", "Bm",
];

const SEARCH_BASE: &str = "https://open.spotify.com/search/";

/// Ranking fields that must stay within 0.0-1.0 after hydration.
const UNIT_FIELDS: [&str; 3] = ["sync_fit_score", "energy", "valence"];

struct Seed {
    title: &'static str,
    artist: &'static str,
    moods: &'static [&'static str],
    instruments: &'static [&'static str],
    bpm: u32,
    energy: f32,
    valence: f32,
}

macro_rules! seed {
    ($title:expr, $artist:expr, [$($m:expr),*], [$($i:expr),*], $bpm:expr, $energy:expr, $valence:expr) => {
        Seed {
            title: $title,
            artist: $artist,
            moods: &[$($m),*],
            instruments: &[$($i),*],
            bpm: $bpm,
            energy: $energy,
            valence: $valence,
        }
    };
}

const SEEDS: &[Seed] = &[
    // Indie / alternative / electronic
    seed!("Midnight City", "M83", ["anthemic", "nocturnal", "cool"], ["synth", "saxophone", "drum machine"], 105, 0.8, 0.6),
    seed!("Intro", "The xx", ["atmospheric", "minimal", "cinematic"], ["guitar", "beat", "bass"], 100, 0.6, 0.4),
    seed!("Walking On A Dream", "Empire of the Sun", ["uplifting", "summery", "adventure"], ["synth", "falsetto"], 127, 0.8, 0.8),
    seed!("Electric Feel", "MGMT", ["groovy", "psychedelic", "indie"], ["bass", "synth", "flute"], 103, 0.7, 0.8),
    seed!("Tongue Tied", "Grouplove", ["fun", "youthful", "party"], ["guitar", "synth"], 113, 0.9, 0.9),
    seed!("Pumped Up Kicks", "Foster The People", ["catchy", "indie", "laid back"], ["whistle", "bass"], 128, 0.7, 0.6),
    seed!("Kids", "MGMT", ["nostalgic", "electronic", "catchy"], ["synth lead", "beat"], 123, 0.8, 0.7),
    seed!("Feel It Still", "Portugal. The Man", ["retro", "cool", "groovy"], ["bass", "falsetto"], 158, 0.8, 0.7),
    seed!("Safe And Sound", "Capital Cities", ["positive", "dance", "trumpet"], ["synth", "trumpet"], 118, 0.8, 0.9),
    seed!("Dog Days Are Over", "Florence + The Machine", ["epic", "building", "joyful"], ["harp", "clapping", "drums"], 150, 0.9, 0.7),
    // Pop / chart
    seed!("Levitating", "Dua Lipa", ["disco", "dance", "confident"], ["bass", "synth", "claps"], 103, 0.9, 0.9),
    seed!("Blinding Lights", "The Weeknd", ["retro-futuristic", "driving", "night"], ["synth", "drum machine"], 171, 0.9, 0.6),
    seed!("As It Was", "Harry Styles", ["bittersweet", "driving", "nostalgic"], ["synth", "drums"], 174, 0.8, 0.6),
    seed!("Can't Stop the Feeling!", "Justin Timberlake", ["happy", "dance", "family"], ["bass", "horn"], 113, 0.9, 0.95),
    seed!("Uptown Funk", "Mark Ronson ft. Bruno Mars", ["funk", "party", "confident"], ["brass", "bass"], 115, 0.95, 0.9),
    seed!("Happy", "Pharrell Williams", ["joyful", "optimistic", "soul"], ["claps", "vocals"], 160, 0.9, 1.0),
    seed!("Flowers", "Miley Cyrus", ["empowering", "disco", "confident"], ["bass", "strings"], 118, 0.7, 0.8),
    seed!("Watermelon Sugar", "Harry Styles", ["summery", "relaxed", "warm"], ["guitar", "horns"], 95, 0.6, 0.8),
    seed!("Shake It Off", "Taylor Swift", ["fun", "upbeat", "carefree"], ["horns", "drums"], 160, 0.9, 0.9),
    seed!("Shut Up and Dance", "WALK THE MOON", ["anthemic", "rock", "party"], ["guitar", "synth"], 128, 0.9, 0.9),
    // Rock / anthemic
    seed!("Seven Nation Army", "The White Stripes", ["iconic", "gritty", "determined"], ["guitar riff", "stomp"], 124, 0.7, 0.5),
    seed!("Mr. Brightside", "The Killers", ["energetic", "urgent", "classic"], ["guitar", "synth"], 148, 0.95, 0.4),
    seed!("Believer", "Imagine Dragons", ["powerful", "percussive", "intense"], ["drums", "vocals"], 125, 0.9, 0.5),
    seed!("Eye of the Tiger", "Survivor", ["determined", "motivational", "classic"], ["guitar", "piano"], 109, 0.8, 0.6),
    seed!("We Will Rock You", "Queen", ["stomp", "anthemic", "crowd"], ["stomp", "clap", "vocals"], 81, 0.7, 0.6),
    seed!("Born to Run", "Bruce Springsteen", ["freedom", "driving", "classic"], ["saxophone", "guitar"], 146, 0.9, 0.7),
    seed!("Heroes", "David Bowie", ["inspiring", "legendary", "emotional"], ["guitar", "synth"], 112, 0.7, 0.6),
    seed!("Start Me Up", "The Rolling Stones", ["rock", "classic", "raw"], ["guitar riff"], 122, 0.8, 0.7),
    seed!("Do I Wanna Know?", "Arctic Monkeys", ["cool", "sexy", "rock"], ["fuzz guitar", "beat"], 85, 0.6, 0.5),
    seed!("Are You Gonna Be My Girl", "Jet", ["high energy", "retro", "fun"], ["tambourine", "guitar"], 105, 0.9, 0.8),
    // Electronic / dance
    seed!("Get Lucky", "Daft Punk", ["disco", "smooth", "night"], ["guitar", "vocoder"], 116, 0.8, 0.8),
    seed!("One More Time", "Daft Punk", ["celebration", "house", "euphoric"], ["autotune", "beat"], 123, 0.9, 0.8),
    seed!("Levels", "Avicii", ["festival", "huge", "uplifting"], ["synth lead", "piano"], 126, 1.0, 0.9),
    seed!("Titanium", "David Guetta ft. Sia", ["powerful", "club", "emotional"], ["synth", "vocals"], 126, 0.9, 0.6),
    seed!("Latch", "Disclosure ft. Sam Smith", ["groovy", "garage", "soulful"], ["synth", "beat"], 122, 0.8, 0.7),
    // Acoustic / folk
    seed!("Home", "Edward Sharpe & The Magnetic Zeros", ["wholesome", "folk", "travel"], ["whistle", "trumpet", "guitar"], 110, 0.6, 0.8),
    seed!("Ho Hey", "The Lumineers", ["simple", "romantic", "folk"], ["shout", "guitar"], 80, 0.5, 0.7),
    seed!("Riptide", "Vance Joy", ["indie", "catchy", "summer"], ["ukulele", "voice"], 100, 0.7, 0.7),
    seed!("Budapest", "George Ezra", ["warm", "storytelling", "bluesy"], ["guitar", "voice"], 128, 0.6, 0.6),
    seed!("Dreams", "Fleetwood Mac", ["timeless", "smooth", "chill"], ["bass", "drums"], 120, 0.5, 0.7),
];

/// Hash-derived attributes of a catalog track.
struct Derived {
    duration: String,
    key: String,
    waveform: Vec<f32>,
}

fn derive(id: &str, seed: &Seed) -> Derived {
    let first = Sha1::digest(format!("{id}:{}:{}", seed.title, seed.artist).as_bytes());
    let second = Sha1::digest(first.as_slice());

    let bytes: Vec<u8> = first.iter().chain(second.iter()).copied().collect();

    let minutes = 2 + u32::from(bytes[0] % 2);
    let seconds = u32::from(bytes[1]) % 60;

    Derived {
        duration: format!("{minutes}:{seconds:02}"),
        key: KEYS[usize::from(bytes[2]) % KEYS.len()].to_string(),
        waveform: bytes
            .iter()
            .take(WAVEFORM_SAMPLES)
            .map(|b| f32::from(*b) / 255.0)
            .collect(),
    }
}

fn build_track(index: usize, seed: &Seed) -> Track {
    let id = format!("t{}", index + 1);
    let derived = derive(&id, seed);
    let query = format!("{} {}", seed.title, seed.artist);

    Track {
        id,
        title: seed.title.to_string(),
        artist: seed.artist.to_string(),
        source: TrackSource::Spotify,
        audio_url: None,
        external_url: Some(format!("{SEARCH_BASE}{}", urlencoding::encode(&query))),
        bpm: seed.bpm,
        energy: seed.energy,
        valence: seed.valence,
        mood_tags: seed.moods.iter().map(ToString::to_string).collect(),
        instrumentation_tags: seed.instruments.iter().map(ToString::to_string).collect(),
        vocal: VocalCategory::Mixed,
        lyric_summary: None,
        sync_fit_score: None,
        fit_reasons: None,
        // Every catalog track is a commercial release.
        route: TrackRoute::Commercial,
        exclusive: false,
        duration: Some(derived.duration),
        key: Some(derived.key),
        waveform: Some(derived.waveform),
    }
}

/// Lookup table over a fixed set of tracks.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from explicit tracks. Later duplicates of an id are
    /// ignored.
    #[must_use]
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let mut index = HashMap::with_capacity(tracks.len());
        let mut unique = Vec::with_capacity(tracks.len());
        for track in tracks {
            if index.contains_key(&track.id) {
                tracing::warn!(id = %track.id, "Duplicate catalog id ignored");
                continue;
            }
            index.insert(track.id.clone(), unique.len());
            unique.push(track);
        }
        Self {
            tracks: unique,
            index,
        }
    }

    /// The built-in catalog, built once per process.
    #[must_use]
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::from_tracks(
                SEEDS
                    .iter()
                    .enumerate()
                    .map(|(i, seed)| build_track(i, seed))
                    .collect(),
            )
        })
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&i| &self.tracks[i])
    }

    /// Reduced projection sent to the model: id, title, artist and tags.
    #[must_use]
    pub fn candidates(&self) -> Vec<CandidateTrack<'_>> {
        self.tracks.iter().map(CandidateTrack::from).collect()
    }

    /// Merge lightweight ranking results onto full catalog records.
    ///
    /// Each delta is laid over the catalog record with the same id; fields
    /// in the delta win. Deltas that are not objects, have no string id, or
    /// name an id outside the catalog are dropped. `sync_fit_score`,
    /// `energy` and `valence` are clamped to 0.0-1.0. Fails only when a merged record no longer forms a valid
    /// track (e.g. the model overwrote `bpm` with text).
    pub fn hydrate(&self, deltas: &[Value]) -> Result<Vec<Track>, String> {
        let mut hydrated = Vec::with_capacity(deltas.len());

        for delta in deltas {
            let Some(fields) = delta.as_object() else {
                tracing::debug!(delta = %delta, "Dropping non-object ranking entry");
                continue;
            };
            let Some(id) = fields.get("id").and_then(Value::as_str) else {
                tracing::debug!(delta = %delta, "Dropping ranking entry without id");
                continue;
            };
            let Some(track) = self.get(id) else {
                tracing::debug!(id, "Dropping ranking entry for unknown track");
                continue;
            };

            let mut merged: Map<String, Value> = match serde_json::to_value(track) {
                Ok(Value::Object(map)) => map,
                Ok(other) => return Err(format!("track {id}: serialized as {other}")),
                Err(e) => return Err(format!("track {id}: {e}")),
            };
            for (key, value) in fields {
                merged.insert(key.clone(), value.clone());
            }
            for field in UNIT_FIELDS {
                if let Some(value) = merged.get(field).and_then(Value::as_f64) {
                    merged.insert(field.to_string(), Value::from(value.clamp(0.0, 1.0)));
                }
            }

            let track: Track = serde_json::from_value(Value::Object(merged))
                .map_err(|e| format!("track {id}: {e}"))?;
            hydrated.push(track);
        }

        Ok(hydrated)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin().clone()
    }
}
