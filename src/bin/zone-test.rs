//! Development tool for exercising robot capabilities against the simulator.
//!
//! Usage:
//!   cargo run --bin zone-test -- zones --zone 1500,1500,2500,2500 --iterations 2
//!   cargo run --bin zone-test -- segments 3 7
//!   cargo run --bin zone-test -- join 3 7
//!   cargo run --bin zone-test -- consumables
//!
//! Every command sent to the simulated robot is printed afterwards.

use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use vacuum_bridge::capabilities::{CleaningZone, SegmentId};
use vacuum_bridge::config::{Config, load_dotenv};
use vacuum_bridge::error::Result;
use vacuum_bridge::map::MapPoint;
use vacuum_bridge::robots::{Robot, build_robot};
use vacuum_bridge::transport::SimulatedViomi;

#[derive(Parser)]
#[command(name = "zone-test")]
#[command(about = "Run robot capabilities against a simulated Viomi robot")]
struct Cli {
    /// Simulated box type (1 dustbin, 2 water tank, 3 both)
    #[arg(long, default_value_t = 3)]
    box_type: u8,

    /// Simulated mop type (1 when a mop is attached)
    #[arg(long, default_value_t = 1)]
    mop_type: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean rectangular zones given in map centimetres
    Zones {
        /// Zone corners as x1,y1,x2,y2 (repeatable)
        #[arg(long = "zone", required = true, value_parser = parse_zone)]
        zones: Vec<(MapPoint, MapPoint)>,

        /// Passes per zone
        #[arg(long, default_value_t = 1)]
        iterations: u32,
    },
    /// Clean map segments
    Segments {
        #[arg(required = true)]
        segment_ids: Vec<SegmentId>,
    },
    /// Merge segment B into segment A
    Join { a: SegmentId, b: SegmentId },
    /// Read consumable wear
    Consumables,
}

fn parse_zone(value: &str) -> std::result::Result<(MapPoint, MapPoint), String> {
    let coords = value
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate: {}", e))?;

    match coords.as_slice() {
        [x1, y1, x2, y2] => Ok((MapPoint::new(*x1, *y1), MapPoint::new(*x2, *y2))),
        _ => Err(format!("expected x1,y1,x2,y2, got {} values", coords.len())),
    }
}

async fn run(robot: &Robot, command: Commands) -> Result<()> {
    // Attachments come from the state poll
    robot.poll_state().await?;

    match command {
        Commands::Zones { zones, iterations } => {
            let zones: Vec<CleaningZone> = zones
                .into_iter()
                .map(|(pa, pc)| CleaningZone::new(pa, pc, iterations))
                .collect();
            robot.zone_cleaning()?.start_zones(&zones).await
        }
        Commands::Segments { segment_ids } => {
            robot.map_segmentation()?.clean_segments(&segment_ids).await
        }
        Commands::Join { a, b } => robot.map_segmentation()?.join_segments(a, b).await,
        Commands::Consumables => {
            for attribute in robot.consumable_monitoring()?.poll_consumables().await? {
                info!(
                    "{} {:?}: {}",
                    attribute.type_name(),
                    attribute.sub_type_name(),
                    attribute.state_payload()
                );
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let sim = Arc::new(SimulatedViomi::new());
    sim.set_prop("box_type", json!(cli.box_type));
    sim.set_prop("mop_type", json!(cli.mop_type));

    let robot = build_robot(&config.robot, sim.clone());
    let outcome = run(&robot, cli.command).await;

    println!("Commands sent:");
    for command in sim.commands() {
        println!("  {} {}", command.name, command.args);
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
