//! Game configuration.
//!
//! Every field has a default, so a config can come from `Default`, a partial
//! JSON document, or `KFCHESS_*` environment variables. All constructors
//! validate before returning; speed in particular is rejected here rather than
//! surfacing later as a NaN during interpolation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::{AnyDestination, ClassicPatterns, MoveRules};
use crate::types::{
    MovementState, BOARD_SIZE, DEFAULT_MOVE_SPEED, LONG_REST_MS, MAX_BOARD_SIZE, NANOS_PER_MILLI,
    SHORT_REST_MS, TILE_SIZE,
};

/// Which move-pattern rule set the board consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesMode {
    /// Any in-bounds destination that is empty or holds an opponent.
    Any,
    #[default]
    Classic,
}

impl RulesMode {
    pub fn build(self) -> Box<dyn MoveRules> {
        match self {
            RulesMode::Any => Box::new(AnyDestination),
            RulesMode::Classic => Box::new(ClassicPatterns),
        }
    }
}

impl FromStr for RulesMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(RulesMode::Any),
            "classic" => Ok(RulesMode::Classic),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: u8,
    /// Tile edge length in pixel units.
    pub tile_size: f64,
    /// Piece speed in pixel units per second.
    pub move_speed: f64,
    pub short_rest_ms: u64,
    pub long_rest_ms: u64,
    pub rules: RulesMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            tile_size: TILE_SIZE,
            move_speed: DEFAULT_MOVE_SPEED,
            short_rest_ms: SHORT_REST_MS,
            long_rest_ms: LONG_REST_MS,
            rules: RulesMode::Classic,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON document.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Create from `KFCHESS_*` environment variables.
    ///
    /// Unset variables keep their defaults; set-but-unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = read(&lookup, "KFCHESS_BOARD_SIZE")? {
            config.board_size = v;
        }
        if let Some(v) = read(&lookup, "KFCHESS_TILE_SIZE")? {
            config.tile_size = v;
        }
        if let Some(v) = read(&lookup, "KFCHESS_MOVE_SPEED")? {
            config.move_speed = v;
        }
        if let Some(v) = read(&lookup, "KFCHESS_SHORT_REST_MS")? {
            config.short_rest_ms = v;
        }
        if let Some(v) = read(&lookup, "KFCHESS_LONG_REST_MS")? {
            config.long_rest_ms = v;
        }
        if let Some(v) = read(&lookup, "KFCHESS_RULES")? {
            config.rules = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardSize {
                size: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        positive("tile_size", self.tile_size)?;
        positive("move_speed", self.move_speed)?;
        Ok(())
    }

    pub fn rest_durations(&self) -> RestDurations {
        RestDurations::from_millis(self.short_rest_ms, self.long_rest_ms)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn read<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value: raw })
}

/// How long a piece stays in each rest state before returning to IDLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestDurations {
    pub short_nanos: i64,
    pub long_nanos: i64,
}

impl RestDurations {
    pub fn from_millis(short_ms: u64, long_ms: u64) -> Self {
        Self {
            short_nanos: (short_ms as i64).saturating_mul(NANOS_PER_MILLI),
            long_nanos: (long_ms as i64).saturating_mul(NANOS_PER_MILLI),
        }
    }

    /// Rest length for `state`; zero for non-rest states.
    pub fn for_state(&self, state: MovementState) -> i64 {
        match state {
            MovementState::ShortRest => self.short_nanos,
            MovementState::LongRest => self.long_nanos,
            _ => 0,
        }
    }
}

impl Default for RestDurations {
    fn default() -> Self {
        Self::from_millis(SHORT_REST_MS, LONG_REST_MS)
    }
}
