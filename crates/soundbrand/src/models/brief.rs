//! The sonic brief: a structured musical-style specification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Energy of the requested music, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnergyLevel::Low => "low",
            EnergyLevel::MediumLow => "medium-low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::MediumHigh => "medium-high",
            EnergyLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Emotional positivity of the requested music, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValenceLevel {
    Negative,
    Neutral,
    Positive,
    High,
}

impl fmt::Display for ValenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValenceLevel::Negative => "negative",
            ValenceLevel::Neutral => "neutral",
            ValenceLevel::Positive => "positive",
            ValenceLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Tempo range in beats per minute, serialized as `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpmRange(pub u32, pub u32);

impl BpmRange {
    #[must_use]
    pub fn low(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn high(self) -> u32 {
        self.1
    }

    #[must_use]
    pub fn contains(self, bpm: u32) -> bool {
        (self.0..=self.1).contains(&bpm)
    }
}

impl fmt::Display for BpmRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} BPM", self.0, self.1)
    }
}

/// Feel and lyric content the music must stay away from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MustAvoid {
    pub feel: Vec<String>,
    pub lyrics: Vec<String>,
}

/// Output of the sonic-brief step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SonicBrief {
    pub overall_mood: Vec<String>,
    pub energy: EnergyLevel,
    pub valence: ValenceLevel,
    pub bpm_range: BpmRange,
    pub keys: Vec<String>,
    pub instrumentation: Vec<String>,
    pub genres: Vec<String>,
    pub vocal_style: String,
    pub lyric_themes: Vec<String>,
    pub sync_contexts: Vec<String>,
    pub must_avoid: MustAvoid,
}

impl SonicBrief {
    pub fn validate(&self) -> Result<(), String> {
        if self.bpm_range.low() > self.bpm_range.high() {
            return Err(format!(
                "bpm_range low {} is above high {}",
                self.bpm_range.low(),
                self.bpm_range.high()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn brief_json() -> serde_json::Value {
        json!({
            "overall_mood": ["uplifting"],
            "energy": "medium_high",
            "valence": "positive",
            "bpm_range": [110, 128],
            "keys": ["C", "G"],
            "instrumentation": ["synth"],
            "genres": ["indie pop"],
            "vocal_style": "airy female",
            "lyric_themes": ["freedom"],
            "sync_contexts": ["OLV"],
            "must_avoid": { "feel": ["retro"], "lyrics": ["brand names"] }
        })
    }

    #[test]
    fn test_brief_deserializes() {
        let brief: SonicBrief = serde_json::from_value(brief_json()).unwrap();
        assert_eq!(brief.energy, EnergyLevel::MediumHigh);
        assert_eq!(brief.bpm_range, BpmRange(110, 128));
        assert!(brief.bpm_range.contains(120));
        assert!(brief.validate().is_ok());
    }

    #[test]
    fn test_inverted_bpm_range_fails_validation() {
        let mut value = brief_json();
        value["bpm_range"] = json!([140, 90]);
        let brief: SonicBrief = serde_json::from_value(value).unwrap();
        assert!(brief.validate().unwrap_err().contains("bpm_range"));
    }

    #[test]
    fn test_unknown_energy_is_rejected() {
        let mut value = brief_json();
        value["energy"] = json!("extreme");
        assert!(serde_json::from_value::<SonicBrief>(value).is_err());
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(EnergyLevel::Low < EnergyLevel::MediumLow);
        assert!(EnergyLevel::MediumHigh < EnergyLevel::High);
        assert!(ValenceLevel::Negative < ValenceLevel::Neutral);
        assert!(ValenceLevel::Positive < ValenceLevel::High);
    }
}
