//! Generator configuration
//!
//! Handles defaults, validation, and loading from JSON files.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dungeon::{DEFAULT_PRUNE_FRACTION, DungeonRect};
use crate::error::ConfigError;

/// Size of the start rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Smallest room extent produced by a split, per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinRoomSize {
    pub x: i32,
    pub y: i32,
}

impl MinRoomSize {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Everything the pipeline needs before `generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub start_size: Size,
    pub min_room_size: MinRoomSize,
    /// Pause between atomic steps, for visualization only
    pub stage_delay_ms: u64,
    /// Rendering toggle for debug observers; never affects the layout
    pub debug_draw: bool,
    /// Fixed seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    pub prune_fraction: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_size: Size::new(100, 100),
            min_room_size: MinRoomSize::new(10, 10),
            stage_delay_ms: 0,
            debug_draw: false,
            seed: None,
            prune_fraction: DEFAULT_PRUNE_FRACTION,
        }
    }
}

impl GeneratorConfig {
    pub fn new(start_size: Size, min_room_size: MinRoomSize) -> Self {
        Self {
            start_size,
            min_room_size,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay_ms = delay.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_debug_draw(mut self, debug_draw: bool) -> Self {
        self.debug_draw = debug_draw;
        self
    }

    pub fn with_prune_fraction(mut self, fraction: f64) -> Self {
        self.prune_fraction = fraction;
        self
    }

    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }

    /// The start room, anchored at the origin
    pub fn start_rect(&self) -> DungeonRect {
        DungeonRect::new(0, 0, self.start_size.width, self.start_size.height)
    }

    /// Check if the start room is too small to ever be split
    pub fn is_degenerate(&self) -> bool {
        let below = |extent: i32, min: i32| i64::from(extent) < 2 * i64::from(min);
        below(self.start_size.width, self.min_room_size.x)
            && below(self.start_size.height, self.min_room_size.y)
    }

    /// Check sizes and fractions
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Size { width, height } = self.start_size;
        if width <= 0 || height <= 0 {
            return Err(ConfigError::InvalidStartSize { width, height });
        }
        let MinRoomSize { x, y } = self.min_room_size;
        if x <= 0 || y <= 0 {
            return Err(ConfigError::InvalidMinRoomSize { x, y });
        }
        if !(0.0..=1.0).contains(&self.prune_fraction) {
            return Err(ConfigError::InvalidPruneFraction(self.prune_fraction));
        }
        Ok(())
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stage_delay(), Duration::ZERO);
        assert!(!config.debug_draw);
        assert!(!config.is_degenerate());
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let config = GeneratorConfig::new(Size::new(0, 10), MinRoomSize::new(2, 2));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidStartSize {
                width: 0,
                height: 10
            })
        );

        let config = GeneratorConfig::new(Size::new(10, 10), MinRoomSize::new(2, -1));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMinRoomSize { x: 2, y: -1 })
        );
    }

    #[test]
    fn test_rejects_bad_prune_fraction() {
        let config = GeneratorConfig::default().with_prune_fraction(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPruneFraction(_))
        ));
    }

    #[test]
    fn test_degenerate_detection() {
        let config = GeneratorConfig::new(Size::new(3, 3), MinRoomSize::new(4, 4));
        assert!(config.is_degenerate());
        assert!(config.validate().is_ok());

        // one qualifying dimension is enough to split
        let config = GeneratorConfig::new(Size::new(8, 3), MinRoomSize::new(4, 4));
        assert!(!config.is_degenerate());
    }

    #[test]
    fn test_huge_minimum_is_degenerate_not_overflow() {
        let config = GeneratorConfig::new(
            Size::new(100, 100),
            MinRoomSize::new(2_000_000_000, i32::MAX),
        );
        assert!(config.validate().is_ok());
        assert!(config.is_degenerate());

        // the other axis can still split
        let config =
            GeneratorConfig::new(Size::new(100, 100), MinRoomSize::new(2_000_000_000, 4));
        assert!(!config.is_degenerate());
    }

    #[test]
    fn test_parse_partial_json() {
        let config = GeneratorConfig::from_json_str(
            r#"{ "start_size": { "width": 40, "height": 30 }, "seed": 7 }"#,
        )
        .unwrap();
        assert_eq!(config.start_size, Size::new(40, 30));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.min_room_size, GeneratorConfig::default().min_room_size);
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = GeneratorConfig::from_json_str(r#"{ "min_room_size": { "x": 0, "y": 4 } }"#)
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidMinRoomSize { x: 0, y: 4 });

        let err = GeneratorConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GeneratorConfig::default()
            .with_seed(99)
            .with_stage_delay(Duration::from_millis(200))
            .with_debug_draw(true);
        let parsed = GeneratorConfig::from_json_str(&config.to_json_string()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file() {
        let err = GeneratorConfig::load_from_file(Path::new("/nonexistent/dungeon.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
