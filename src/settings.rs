//! Board, physics and session settings
//!
//! Persisted as JSON. Missing fields fall back to the default board.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};

/// Everything the board builder and the simulation read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board layout ===
    /// Number of peg rows, counting the omitted apex row
    pub row_count: u32,
    /// Vertical distance between peg rows
    pub row_spacing_y: f32,
    /// Horizontal distance between pegs in a row
    pub peg_spacing_x: f32,
    /// Offset added to every peg row's y position
    pub spawn_top_margin: f32,
    /// Board width; the lattice is centered on `board_width / 2`
    pub board_width: f32,
    /// Height at which balls are dropped
    pub spawn_y: f32,
    pub peg_radius: f32,
    pub ball_radius: f32,
    pub bin_width: f32,
    pub bin_height: f32,

    // === Physics ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Fraction of velocity kept after a wall or floor bounce
    pub restitution: f32,
    /// Speed of a ball leaving a peg (pixels/s)
    pub bounce_speed: f32,
    /// Total width of the random bounce perturbation (radians)
    pub bounce_angle_spread: f32,

    // === Auto-stop ===
    /// Whether the auto-stop gate starts armed
    pub auto_stop_enabled: bool,
    /// Horizontal line that fires the gate
    pub auto_stop_line_y: f32,

    // === Economics ===
    /// One multiplier per bin, left to right
    pub payout_table: Vec<f64>,
    /// Debited per ball at spawn, and the stake payouts multiply
    pub cost_per_ball: f64,
    /// Balance a fresh wallet starts with
    pub starting_balance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            row_count: ROW_COUNT,
            row_spacing_y: ROW_SPACING_Y,
            peg_spacing_x: PEG_SPACING_X,
            spawn_top_margin: SPAWN_TOP_MARGIN,
            board_width: BOARD_WIDTH,
            spawn_y: SPAWN_Y,
            peg_radius: PEG_RADIUS,
            ball_radius: BALL_RADIUS,
            bin_width: BIN_WIDTH,
            bin_height: BIN_HEIGHT,

            gravity: GRAVITY,
            restitution: RESTITUTION,
            bounce_speed: BOUNCE_SPEED,
            bounce_angle_spread: BOUNCE_ANGLE_SPREAD,

            auto_stop_enabled: false,
            auto_stop_line_y: AUTO_STOP_LINE_Y,

            payout_table: PAYOUT_TABLE.to_vec(),
            cost_per_ball: COST_PER_BALL,
            starting_balance: STARTING_BALANCE,
        }
    }
}

impl Settings {
    /// Number of bins a board built from these settings has
    pub fn bin_count(&self) -> usize {
        self.row_count.saturating_sub(1) as usize
    }

    /// Default physics on a board with `row_count` rows and the given payouts
    pub fn with_rows(row_count: u32, payout_table: Vec<f64>) -> Self {
        Self {
            row_count,
            payout_table,
            ..Self::default()
        }
    }

    /// Check every constraint the board builder relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_count < 2 {
            return Err(ConfigError::TooFewRows(self.row_count));
        }

        let positive = [
            ("row_spacing_y", self.row_spacing_y),
            ("peg_spacing_x", self.peg_spacing_x),
            ("board_width", self.board_width),
            ("peg_radius", self.peg_radius),
            ("ball_radius", self.ball_radius),
            ("bin_width", self.bin_width),
            ("bin_height", self.bin_height),
            ("gravity", self.gravity),
            ("bounce_speed", self.bounce_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::non_positive(name, value));
            }
        }
        for (name, value) in [
            ("spawn_top_margin", self.spawn_top_margin),
            ("spawn_y", self.spawn_y),
            ("auto_stop_line_y", self.auto_stop_line_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::non_positive(name, value));
            }
        }

        if (self.bin_width - self.peg_spacing_x).abs() > 1e-3 {
            return Err(ConfigError::BinsDoNotTile {
                bin_width: self.bin_width,
                peg_spacing: self.peg_spacing_x,
            });
        }
        if !(0.0..1.0).contains(&self.restitution) {
            return Err(ConfigError::Restitution(self.restitution));
        }
        if !(0.0..std::f32::consts::PI).contains(&self.bounce_angle_spread) {
            return Err(ConfigError::BounceSpread(self.bounce_angle_spread));
        }

        let expected = self.bin_count();
        if self.payout_table.len() != expected {
            return Err(ConfigError::PayoutTableLength {
                expected,
                actual: self.payout_table.len(),
            });
        }
        if let Some(index) = self.payout_table.iter().position(|m| !m.is_finite()) {
            return Err(ConfigError::PayoutNotFinite { index });
        }

        for (name, value) in [
            ("cost_per_ball", self.cost_per_ball),
            ("starting_balance", self.starting_balance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeAmount { name, value });
            }
        }

        Ok(())
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from `path` if given, otherwise use the default board
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
