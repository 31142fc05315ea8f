//! Headless lookup-table generator.
//!
//! Ticks the grid scheduler to completion and writes the resulting angle
//! table as CSV. Configuration comes from environment variables:
//! - `ARM_LUT_CONFIG`: optional path to a JSON file overriding the arm
//!   geometry and grid bounds
//! - `ARM_LUT_OUT`: output path for the table (default `arm_lut.csv`)

use std::error::Error;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use arm_kinematics::{
    ArmConfig, ArmKinematics, GridConfig, GridScheduler, IkSolver, TickStatus, WholeAngleRefiner,
};
use lut_gen::export;

/// Run configuration: arm geometry plus grid bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RunConfig {
    #[serde(default)]
    arm: ArmConfig,
    #[serde(default)]
    grid: GridConfig,
}

fn load_config(path: &str) -> Result<RunConfig, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::var("ARM_LUT_CONFIG") {
        Ok(path) => {
            info!("loading configuration from {}", path);
            load_config(&path)?
        }
        Err(_) => RunConfig::default(),
    };
    let out_path = std::env::var("ARM_LUT_OUT").unwrap_or_else(|_| "arm_lut.csv".to_string());

    let kinematics = ArmKinematics::from_config(config.arm)?;
    let mut scheduler = GridScheduler::new(
        kinematics,
        IkSolver::new(),
        WholeAngleRefiner,
        config.grid,
    )?;
    info!(cells = scheduler.grid().cell_count(), "solving grid");

    loop {
        match scheduler.tick() {
            TickStatus::Working => {}
            TickStatus::Completed | TickStatus::Idle => break,
        }
    }

    let effector = scheduler.effector_position();
    info!(
        pose = %scheduler.current_pose(),
        x = effector.x,
        y = effector.y,
        z = effector.z,
        "final pose"
    );

    let table = scheduler.lookup_table();
    let unsolved = table.rows.iter().filter(|row| !row.solved).count();
    if unsolved > 0 {
        warn!(unsolved, "some targets never converged");
    }

    export::write_csv_file(&out_path, &table)?;
    info!(rows = table.rows.len(), path = %out_path, "lookup table written");
    Ok(())
}
