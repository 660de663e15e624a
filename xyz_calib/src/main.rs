//! # XYZ Calibration Session Binary
//!
//! Runs a primary calibration against a simulated manipulator rig and
//! checks the result by sending the manipulator to the stage position.
//!
//! # Usage
//!
//! ```bash
//! # Built-in rig
//! xyz_calib
//!
//! # Rig from file, verbose, calibration report on stdout
//! xyz_calib --config config/rig.toml -v --report
//!
//! # JSON logs
//! xyz_calib --config config/rig.toml --json
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;
use xyz_calib::config::RigConfig;
use xyz_calib::simulation::{
    ManipulatorGeometry, SimulatedController, SimulatedStage, StageCentering,
};
use xyz_calib::{VirtualXyzUnit, XyzAxes, calibrate};
use xyz_common::config::{ConfigLoader, LogLevel};
use xyz_common::device::XyzDevice;
use xyz_common::geometry::{to_array, vec3};

/// Residual above which the verification move is reported as off target, µm.
const GO_TOLERANCE_UM: f64 = 0.1;

/// XYZ calibration - simulated manipulator calibration session
#[derive(Parser, Debug)]
#[command(name = "xyz_calib")]
#[command(version)]
#[command(about = "Calibrate a simulated XYZ manipulator against a reference stage")]
#[command(long_about = None)]
struct Args {
    /// Path to rig configuration (rig.toml). Built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    /// Print the calibration report as JSON on stdout
    #[arg(long)]
    report: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("Calibration session failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RigConfig::load(path),
        None => Ok(RigConfig::default()),
    };

    // Install logging before surfacing a config error so it gets reported.
    let log_level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);
    let config = config?;

    info!("XYZ calibration v{} starting...", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => info!("Loaded rig config from {}", path.display()),
        None => info!("No config given, using built-in rig"),
    }
    config.validate()?;

    let geometry = ManipulatorGeometry::new(
        vec3(config.manipulator.tip_position),
        vec3(config.manipulator.direction),
    )?;
    let stage = SimulatedStage::new(vec3(config.stage.position));
    let mut controller = SimulatedController::new(config.controller.axis_count);
    let device = XyzAxes::new(&mut controller, config.manipulator.axes)?;

    let mut unit = VirtualXyzUnit::new(device, &stage);
    let mut view = StageCentering::new(&geometry, &stage);

    info!(
        service = %config.shared.service_name,
        axes = ?config.manipulator.axes,
        "Running primary calibration"
    );
    let report = calibrate(
        &mut unit,
        &config.calibration.target_vectors(),
        &mut view,
        config.calibration.precision_threshold,
    )?;

    // Send the tip back to where the stage was configured and compare.
    stage.center_on(vec3(config.stage.position));
    unit.go()?;
    let native = unit.device_mut().position()?;
    let tip = geometry.tip_position(&native);
    let residual = (tip - vec3(config.stage.position)).norm();
    if residual > GO_TOLERANCE_UM {
        warn!(residual, tip = ?to_array(&tip), "Tip missed stage position");
    } else {
        info!(residual, "Tip reached stage position");
    }

    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!("XYZ calibration session complete");
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(log_level)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
