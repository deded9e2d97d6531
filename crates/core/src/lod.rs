use serde::Serialize;

use crate::error::ConfigError;

/// Level selected when the config does not name one.
pub const DEFAULT_LEVEL: u32 = 6;

/// A discrete zoom preset.
///
/// `level` multiplies the base width to give the content width. The label
/// reads as the hours visible per fixed screen unit (`48 / level`), and the
/// item label font grows with the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LodPreset {
    pub level: u32,
    pub label: &'static str,
    pub font_size: f64,
}

const PRESETS: [LodPreset; 4] = [
    LodPreset {
        level: 4,
        label: "12h",
        font_size: 10.0,
    },
    LodPreset {
        level: 6,
        label: "8h",
        font_size: 12.0,
    },
    LodPreset {
        level: 12,
        label: "4h",
        font_size: 14.0,
    },
    LodPreset {
        level: 24,
        label: "2h",
        font_size: 18.0,
    },
];

impl LodPreset {
    /// All presets, coarsest first.
    pub fn all() -> &'static [LodPreset] {
        &PRESETS
    }

    pub fn select(level: u32) -> Result<LodPreset, ConfigError> {
        PRESETS
            .iter()
            .find(|preset| preset.level == level)
            .copied()
            .ok_or(ConfigError::InvalidLevel(level))
    }

    pub fn content_width(&self, base_width: f64) -> f64 {
        base_width * f64::from(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_hours_per_unit() {
        for preset in LodPreset::all() {
            assert_eq!(preset.label, format!("{}h", 48 / preset.level));
        }
    }

    #[test]
    fn font_grows_with_level() {
        let fonts: Vec<f64> = LodPreset::all().iter().map(|p| p.font_size).collect();
        assert_eq!(fonts, vec![10.0, 12.0, 14.0, 18.0]);
    }

    #[test]
    fn select_round_trips() {
        for level in [4, 6, 12, 24] {
            let preset = LodPreset::select(level).unwrap();
            assert_eq!(preset.level, level);
            assert_eq!(preset.content_width(100.0), 100.0 * f64::from(level));
        }
    }

    #[test]
    fn rejects_unknown_levels() {
        for level in [0, 1, 5, 8, 48] {
            assert_eq!(LodPreset::select(level), Err(ConfigError::InvalidLevel(level)));
        }
    }
}
