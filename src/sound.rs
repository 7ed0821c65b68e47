//! Sound class identifiers

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every sound the player knows how to produce.
///
/// The identifiers are stable: they appear in persisted settings and in
/// recorded asset file names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundClass {
    Water,
    Rain,
    Birds,
    Bubble,
    WhiteNoise,
    Warning,
}

impl SoundClass {
    /// Classes that can play on the ambience voice.
    pub const AMBIENCE: [SoundClass; 5] = [
        SoundClass::Water,
        SoundClass::Rain,
        SoundClass::Birds,
        SoundClass::Bubble,
        SoundClass::WhiteNoise,
    ];

    pub const ALL: [SoundClass; 6] = [
        SoundClass::Water,
        SoundClass::Rain,
        SoundClass::Birds,
        SoundClass::Bubble,
        SoundClass::WhiteNoise,
        SoundClass::Warning,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SoundClass::Water => "water",
            SoundClass::Rain => "rain",
            SoundClass::Birds => "birds",
            SoundClass::Bubble => "bubble",
            SoundClass::WhiteNoise => "white-noise",
            SoundClass::Warning => "warning",
        }
    }

    #[inline]
    pub fn is_ambience(self) -> bool {
        self != SoundClass::Warning
    }
}

impl Default for SoundClass {
    fn default() -> Self {
        SoundClass::Water
    }
}

impl fmt::Display for SoundClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a string names no known sound class.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown sound class `{0}`")]
pub struct ParseSoundClassError(pub String);

impl FromStr for SoundClass {
    type Err = ParseSoundClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundClass::ALL
            .iter()
            .copied()
            .find(|class| class.id() == s)
            .ok_or_else(|| ParseSoundClassError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for class in SoundClass::ALL {
            assert_eq!(class.id().parse::<SoundClass>(), Ok(class));
        }
    }

    #[test]
    fn serde_uses_the_same_ids() {
        let json = serde_json::to_string(&SoundClass::WhiteNoise).unwrap();
        assert_eq!(json, "\"white-noise\"");
        let back: SoundClass = serde_json::from_str("\"bubble\"").unwrap();
        assert_eq!(back, SoundClass::Bubble);
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!("thunder".parse::<SoundClass>().is_err());
    }

    #[test]
    fn warning_is_not_ambience() {
        assert!(!SoundClass::Warning.is_ambience());
        assert!(SoundClass::AMBIENCE.iter().all(|c| c.is_ambience()));
    }
}
