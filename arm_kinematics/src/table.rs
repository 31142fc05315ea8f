//! The logical lookup table assembled from solved targets.
//!
//! Rows carry whole-degree angles only; the embedded consumer cannot store
//! anything finer. Textual rendering lives in the exporter, not here.

use serde::{Deserialize, Serialize};

use crate::grid::{AxisRange, GridConfig};
use crate::scheduler::{TargetPoint, TargetState};
use crate::{Joint, JointAngles};

/// Sampling summary for one axis of the exported table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AxisSummary {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub count: usize,
}

impl From<AxisRange> for AxisSummary {
    fn from(range: AxisRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
            step: range.step,
            count: range.count(),
        }
    }
}

/// One grid cell: its coordinates and the whole-degree joint angles that
/// reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableRow {
    pub x: f64,
    pub z: f64,
    /// Degrees per joint, in chain order.
    pub angles: [i16; Joint::COUNT],
    /// False when the solver gave up on this cell.
    pub solved: bool,
}

/// Row-major table of whole-degree joint angles over the grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupTable {
    pub x: AxisSummary,
    pub z: AxisSummary,
    /// Table height the grid was sampled at.
    pub y: f64,
    pub rows: Vec<TableRow>,
}

impl LookupTable {
    /// Collect finished targets into the logical table, preserving the
    /// scheduler's enumeration order.
    pub fn build(grid: &GridConfig, targets: &[TargetPoint]) -> Self {
        let rows = targets
            .iter()
            .map(|target| TableRow {
                x: target.initial_pos.x,
                z: target.initial_pos.z,
                angles: whole_degrees(&target.rots),
                solved: target.state == TargetState::Refined,
            })
            .collect();

        Self {
            x: grid.x.into(),
            z: grid.z.into(),
            y: grid.y,
            rows,
        }
    }
}

/// Refinement leaves integral values behind, so the cast is exact.
fn whole_degrees(angles: &JointAngles) -> [i16; Joint::COUNT] {
    let mut out = [0i16; Joint::COUNT];
    for joint in Joint::ALL {
        out[joint.index()] = angles[joint] as i16;
    }
    out
}
