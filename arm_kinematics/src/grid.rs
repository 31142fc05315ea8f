//! The grid of reach targets on the fixed-height table plane.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Inclusive sampling range along one axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Number of samples, both endpoints included.
    pub fn count(&self) -> usize {
        // the epsilon guards against step quantization on decimal steps
        ((self.max - self.min) / self.step + 1e-9).floor() as usize + 1
    }

    /// Coordinate of the `index`th sample.
    pub fn value(&self, index: usize) -> f64 {
        self.min + self.step * index as f64
    }

    fn validate(&self, axis: &str) -> Result<(), String> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(format!("{} step must be positive, got {}", axis, self.step));
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.max < self.min {
            return Err(format!(
                "{} range is invalid: min {} max {}",
                axis, self.min, self.max
            ));
        }
        Ok(())
    }
}

/// Iteration bounds for the lookup grid: X and Z ranges sampled at a fixed
/// table height Y.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    pub x: AxisRange,
    pub z: AxisRange,
    pub y: f64,
}

impl GridConfig {
    /// Workspace grid the desktop arm's angle table is generated over.
    pub fn table_grid() -> Self {
        Self {
            x: AxisRange::new(-120.0, 120.0, 10.0),
            z: AxisRange::new(140.0, 300.0, 20.0),
            y: 100.0,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.x.count() * self.z.count()
    }

    /// Target coordinate for a row-major cell index: X varies fastest
    /// within a fixed Z row.
    pub fn cell(&self, index: usize) -> Point3<f64> {
        let ix = index % self.x.count();
        let iz = index / self.x.count();
        Point3::new(self.x.value(ix), self.y, self.z.value(iz))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.x.validate("x")?;
        self.z.validate("z")?;
        if !self.y.is_finite() {
            return Err(format!("y must be finite, got {}", self.y));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::table_grid()
    }
}
