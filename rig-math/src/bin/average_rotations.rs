//! Average a set of rotation samples stored in a JSON file
//!
//! Reads a rotation set (see `rig_math::samples`), averages it with the
//! eigen-decomposition averager and prints the result as a quaternion and as
//! Euler angles in the requested rotation order.
//!
//! Usage:
//! ```text
//! cargo run --bin average_rotations -- samples.json --weighted --order zxy
//! ```
//!
//! Set `RUST_LOG=debug` for details on weight reconciliation.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rig_math::{EulerRotation, RotationOrder, RotationSetFile};
use std::path::PathBuf;

/// Command line arguments for rotation averaging
#[derive(Parser, Debug)]
#[command(
    name = "Average Rotations",
    about = "Computes the least-squares average of a set of rotations",
    long_about = None
)]
struct Args {
    /// JSON file holding `rotations` and optional `weights`
    input: PathBuf,

    /// Apply the stored weights (missing weights count as 1.0)
    #[arg(long)]
    weighted: bool,

    /// Rotation order for the Euler output
    #[arg(long, default_value_t = RotationOrder::Xyz)]
    order: RotationOrder,

    /// Print the result as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let samples = RotationSetFile::load_from_file(&args.input)
        .with_context(|| format!("failed to load rotation set from {}", args.input.display()))?;

    info!(
        "averaging {} rotations ({} weights, weighted={})",
        samples.rotations.len(),
        samples.weights.len(),
        args.weighted
    );

    let rotation = samples.average(args.weighted);
    let euler = EulerRotation::from_quaternion(&rotation, args.order);
    let degrees = euler.to_degrees();

    if args.json {
        let output = serde_json::json!({
            "rotation": rotation,
            "order": args.order,
            "euler_degrees": degrees,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to serialize result")?
        );
    } else {
        println!(
            "quaternion (x, y, z, w): {:.9} {:.9} {:.9} {:.9}",
            rotation.x, rotation.y, rotation.z, rotation.w
        );
        println!(
            "euler {} (deg): {:.6} {:.6} {:.6}",
            args.order, degrees[0], degrees[1], degrees[2]
        );
    }

    Ok(())
}
