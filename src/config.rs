//! Generator tuning
//!
//! Pacing (length, checkpoint frequency) and feature rarity. Geometry stays
//! fixed in `consts` so collision sampling matches the block builders.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Track length presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrackLength {
    Sprint,
    #[default]
    Standard,
    Endurance,
}

impl TrackLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackLength::Sprint => "Sprint",
            TrackLength::Standard => "Standard",
            TrackLength::Endurance => "Endurance",
        }
    }

    /// Band the preferred length is drawn from (segments, inclusive)
    pub fn preferred_band(&self) -> (u32, u32) {
        match self {
            TrackLength::Sprint => (15, 25),
            TrackLength::Standard => (30, 50),
            TrackLength::Endurance => (60, 90),
        }
    }

    /// Hard cap on committed segments
    pub fn max_segments(&self) -> usize {
        match self {
            TrackLength::Sprint => 100,
            TrackLength::Standard => 200,
            TrackLength::Endurance => 300,
        }
    }
}

impl FromStr for TrackLength {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sprint" | "short" => Ok(TrackLength::Sprint),
            "standard" | "medium" => Ok(TrackLength::Standard),
            "endurance" | "long" => Ok(TrackLength::Endurance),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

/// Roulette weights per candidate kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveWeights {
    pub straight: f32,
    /// Straight weight during a turbo run
    pub forced_straight: f32,
    /// Each of the four turn candidates (left/right x tight/wide)
    pub turn: f32,
    /// Each ramp candidate
    pub ramp: f32,
    pub start_bank: f32,
    pub end_bank: f32,
    pub turbo: f32,
}

impl Default for MoveWeights {
    fn default() -> Self {
        Self {
            straight: 4.0,
            forced_straight: 1000.0,
            turn: 3.0,
            ramp: 1.0,
            start_bank: 0.5,
            end_bank: 100.0,
            turbo: 1.0,
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    // === Length ===
    /// Preferred length band (drawn once per generation)
    pub preferred_length_min: u32,
    pub preferred_length_max: u32,
    /// Committed segment cap (Start and Finish included)
    pub max_segments: usize,
    /// Walker step cap (backtracked steps count too)
    pub max_steps: u32,
    /// Candidate-list attempts per step before backtracking
    pub attempts_per_step: u32,

    // === Pacing ===
    /// Added to the checkpoint chance every step
    pub checkpoint_increment: f32,
    /// Added to the finish chance every step past the preferred length
    pub finish_increment: f32,

    // === Rarity ===
    pub weights: MoveWeights,
    /// Chance a placeable straight is offered as a turbo too
    pub turbo_chance: f32,
    /// Straight-class segments forced after a turbo
    pub turbo_run: u32,

    // === Banking ===
    /// Roll magnitude band (radians)
    pub bank_min: f32,
    pub bank_max: f32,
    /// Banked segments before the closing transition is offered
    pub bank_min_segments: u32,
    /// Segments after a closing transition before banking may start again
    pub bank_cooldown: u32,

    // === Ramps ===
    pub ramp_height_min: f32,
    pub ramp_height_max: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self::from_preset(TrackLength::Standard)
    }
}

impl TrackConfig {
    /// Defaults with the preset's length band and cap
    pub fn from_preset(preset: TrackLength) -> Self {
        let (lo, hi) = preset.preferred_band();
        let max_segments = preset.max_segments();
        Self {
            preferred_length_min: lo,
            preferred_length_max: hi,
            max_segments,
            max_steps: max_segments as u32 * 4,
            attempts_per_step: 8,

            checkpoint_increment: 0.04,
            finish_increment: 0.05,

            weights: MoveWeights::default(),
            turbo_chance: 0.15,
            turbo_run: 3,

            bank_min: 0.25,
            bank_max: 0.5,
            bank_min_segments: 8,
            bank_cooldown: 6,

            ramp_height_min: 3.0,
            ramp_height_max: 8.0,
        }
    }

    /// Apply a length preset, keeping pacing and rarity
    pub fn apply_preset(&mut self, preset: TrackLength) {
        let (lo, hi) = preset.preferred_band();
        self.preferred_length_min = lo;
        self.preferred_length_max = hi;
        self.max_segments = preset.max_segments();
        self.max_steps = self.max_segments as u32 * 4;
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preferred_length_min > self.preferred_length_max {
            return Err(ConfigError::InvertedBand {
                field: "preferred_length",
                min: self.preferred_length_min as f32,
                max: self.preferred_length_max as f32,
            });
        }
        // Start, one closing bank transition and Finish must always fit
        if self.max_segments < 3 {
            return Err(ConfigError::CapTooSmall {
                field: "max_segments",
                value: self.max_segments,
                min: 3,
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::CapTooSmall {
                field: "max_steps",
                value: 0,
                min: 1,
            });
        }
        if self.attempts_per_step == 0 {
            return Err(ConfigError::CapTooSmall {
                field: "attempts_per_step",
                value: 0,
                min: 1,
            });
        }
        if !(self.bank_min <= self.bank_max) {
            return Err(ConfigError::InvertedBand {
                field: "bank",
                min: self.bank_min,
                max: self.bank_max,
            });
        }
        if !(self.ramp_height_min <= self.ramp_height_max) || self.ramp_height_min <= 0.0 {
            return Err(ConfigError::InvertedBand {
                field: "ramp_height",
                min: self.ramp_height_min,
                max: self.ramp_height_max,
            });
        }
        let w = &self.weights;
        let weights = [
            ("weights.straight", w.straight),
            ("weights.forced_straight", w.forced_straight),
            ("weights.turn", w.turn),
            ("weights.ramp", w.ramp),
            ("weights.start_bank", w.start_bank),
            ("weights.end_bank", w.end_bank),
            ("weights.turbo", w.turbo),
        ];
        for (field, value) in weights {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidWeight { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TrackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.preferred_length_min, 30);
        assert_eq!(config.preferred_length_max, 50);
        assert_eq!(config.max_segments, 200);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("sprint".parse::<TrackLength>().ok(), Some(TrackLength::Sprint));
        assert_eq!("LONG".parse::<TrackLength>().ok(), Some(TrackLength::Endurance));
        assert!(matches!(
            "marathon".parse::<TrackLength>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = TrackConfig::from_json(r#"{ "turbo_chance": 0.5, "weights": { "turn": 1.0 } }"#)
            .expect("partial config parses");
        assert_eq!(config.turbo_chance, 0.5);
        assert_eq!(config.weights.turn, 1.0);
        assert_eq!(config.weights.straight, MoveWeights::default().straight);
        assert_eq!(config.max_segments, 200);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = TrackConfig::from_preset(TrackLength::Sprint);
        config.bank_cooldown = 11;
        let json = config.to_json().expect("serializes");
        let back = TrackConfig::from_json(&json).expect("parses");
        assert_eq!(back.bank_cooldown, 11);
        assert_eq!(back.max_segments, 100);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = TrackConfig::default();
        config.preferred_length_min = 60;
        assert!(matches!(config.validate(), Err(ConfigError::InvertedBand { .. })));

        let mut config = TrackConfig::default();
        config.max_segments = 2;
        assert!(matches!(config.validate(), Err(ConfigError::CapTooSmall { .. })));

        let mut config = TrackConfig::default();
        config.weights.turn = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWeight { .. })));

        assert!(matches!(
            TrackConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_apply_preset_keeps_pacing() {
        let mut config = TrackConfig::default();
        config.checkpoint_increment = 0.2;
        config.apply_preset(TrackLength::Endurance);
        assert_eq!(config.checkpoint_increment, 0.2);
        assert_eq!(config.preferred_length_min, 60);
        assert_eq!(config.max_segments, 300);
    }
}
