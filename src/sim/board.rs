//! Static board geometry: the peg lattice and the bin row beneath it
//!
//! Pegs form a triangle with the apex peg omitted: row `r` (2..=row_count)
//! holds `r` pegs. The bins sit half a row below the last peg row, one between
//! each pair of adjacent final-row pegs, and tile the capture line exactly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::Settings;

/// A fixed circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    /// Lattice row (2 is the top row)
    pub row: u32,
}

/// A rectangular capture zone with its payout multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// 0-based, left to right
    pub index: usize,
    /// Left edge
    pub x: f32,
    /// Top edge (the capture line)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub payout: f64,
}

impl Bin {
    /// Whether a ball center at `x` lies over this bin (`[x, x + width)`)
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x < self.x + self.width
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Immutable board built from [`Settings`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pegs: Vec<Peg>,
    bins: Vec<Bin>,
    payouts: Vec<f64>,
    peg_radius: f32,
    spawn_point: Vec2,
}

impl Board {
    /// Build the lattice and bin row. Fails if the settings are malformed.
    pub fn build(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let center_x = settings.board_width / 2.0;
        let row_y = |row: u32| settings.spawn_top_margin + row as f32 * settings.row_spacing_y;

        let mut pegs = Vec::with_capacity(peg_count(settings.row_count));
        for row in 2..=settings.row_count {
            let y = row_y(row);
            let start_x = center_x - (row - 1) as f32 * settings.peg_spacing_x / 2.0;
            for i in 0..row {
                pegs.push(Peg {
                    pos: Vec2::new(start_x + i as f32 * settings.peg_spacing_x, y),
                    row,
                });
            }
        }

        // Bins sit between adjacent pegs of the last row
        let last_row = settings.row_count;
        let last_row_start = center_x - (last_row - 1) as f32 * settings.peg_spacing_x / 2.0;
        let bin_y = row_y(last_row) + settings.row_spacing_y / 2.0;
        let bins = settings
            .payout_table
            .iter()
            .enumerate()
            .map(|(index, &payout)| {
                let center = last_row_start + (index as f32 + 0.5) * settings.peg_spacing_x;
                Bin {
                    index,
                    x: center - settings.bin_width / 2.0,
                    y: bin_y,
                    width: settings.bin_width,
                    height: settings.bin_height,
                    payout,
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Built board: {} pegs in {} rows, {} bins at y={}",
            pegs.len(),
            last_row - 1,
            bins.len(),
            bin_y
        );

        Ok(Self {
            pegs,
            bins,
            payouts: settings.payout_table.clone(),
            peg_radius: settings.peg_radius,
            spawn_point: Vec2::new(center_x, settings.spawn_y),
        })
    }

    /// Pegs, row by row from the top, left to right within a row
    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    /// Pegs of a single lattice row
    pub fn row(&self, row: u32) -> impl Iterator<Item = &Peg> {
        self.pegs.iter().filter(move |p| p.row == row)
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bin(&self, index: usize) -> Option<&Bin> {
        self.bins.get(index)
    }

    pub fn peg_radius(&self) -> f32 {
        self.peg_radius
    }

    /// Where every ball of a batch starts
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    /// Left edge of the bin row
    pub fn left_wall(&self) -> f32 {
        self.bins.first().map(|b| b.x).unwrap_or(self.spawn_point.x)
    }

    /// Right edge of the bin row
    pub fn right_wall(&self) -> f32 {
        self.bins
            .last()
            .map(|b| b.x + b.width)
            .unwrap_or(self.spawn_point.x)
    }

    /// Top edge of the bins
    pub fn capture_line_y(&self) -> f32 {
        self.bins.first().map(|b| b.y).unwrap_or(self.spawn_point.y)
    }

    /// Bottom edge of the board
    pub fn floor_y(&self) -> f32 {
        self.bins
            .first()
            .map(|b| b.y + b.height)
            .unwrap_or(self.spawn_point.y)
    }

    /// Multipliers in bin order
    pub fn payout_table(&self) -> &[f64] {
        &self.payouts
    }
}

/// Pegs in a lattice of `row_count` rows with the apex omitted
pub fn peg_count(row_count: u32) -> usize {
    (2..=row_count as usize).sum()
}
