use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use farmflow_scheduler::{
    ConflictStrategy, Fleet, SchedulerConfig, SchedulerSession, logging, sim,
};

#[derive(Parser, Debug)]
#[command(version, about = "FarmFlow mission scheduler", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable dev logs even in release builds
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scripted drag demo on the sample fleet (default)
    Demo,
    /// List conflicts of a fleet document
    Conflicts {
        /// Fleet JSON document; the sample fleet when omitted
        fleet: Option<PathBuf>,
        #[arg(long)]
        strategy: Option<ConflictStrategy>,
    },
    /// Show the inspector and JSON preview for one mission
    Inspect {
        mission_id: String,
        #[arg(long)]
        fleet: Option<PathBuf>,
    },
    /// Time conflict detection on a generated timeline
    Bench {
        lanes: Option<usize>,
        missions_per_lane: Option<usize>,
        #[arg(long)]
        iterations: Option<usize>,
        #[arg(long)]
        strategy: Option<ConflictStrategy>,
    },
    /// Sweep benchmark sizes; sets are comma lists, "-" keeps the default
    Stress {
        lane_sets: Option<String>,
        mission_sets: Option<String>,
        #[arg(long)]
        iterations: Option<usize>,
    },
}

fn parse_usize_list(arg: &str) -> Option<Vec<usize>> {
    if arg == "-" {
        return None;
    }
    let mut values = Vec::new();
    for part in arg.split(',') {
        if part.trim().is_empty() {
            return None;
        }
        let value = part.trim().parse::<usize>().ok()?;
        values.push(value);
    }
    Some(values)
}

fn parse_set(name: &str, arg: Option<&str>) -> Result<Option<Vec<usize>>> {
    match arg {
        None | Some("-") => Ok(None),
        Some(raw) => match parse_usize_list(raw) {
            Some(values) => Ok(Some(values)),
            None => bail!("stress: invalid {name} value: {raw}"),
        },
    }
}

fn load_fleet(path: Option<&PathBuf>) -> Result<Fleet> {
    match path {
        Some(path) => Fleet::from_file(path)
            .with_context(|| format!("loading fleet from {}", path.display())),
        None => Ok(Fleet::sample()),
    }
}

fn inspect(config: &SchedulerConfig, fleet: Fleet, mission_id: &str) -> Result<()> {
    let timeline = fleet.into_timeline()?;
    let mut session = SchedulerSession::new(timeline, config);
    let Some(mission) = session.timeline().mission(mission_id) else {
        bail!("unknown mission: {mission_id}");
    };
    let grab = config.geometry().left_px(mission.start_hour);
    // A press without movement selects the mission, exactly like a click.
    session.pointer_down(mission_id, grab);
    session.pointer_up();

    let inspector = session.inspector().context("mission not selectable")?;
    println!("{} ({})", inspector.name, inspector.mission_id);
    println!("robot={}", inspector.robot_name);
    println!(
        "schedule={:02}:00-{:02}:00 duration={}h",
        inspector.start_hour, inspector.end_hour, inspector.duration_hours
    );
    for (key, value) in &inspector.parameters {
        println!("param.{key}={value}");
    }
    if inspector.has_conflicts() {
        for warning in &inspector.conflicts {
            println!("conflict with {}: {}", warning.with, warning.message);
        }
    } else {
        println!("No conflicts detected");
    }
    if let Some(json) = session.json_preview(chrono::Utc::now())? {
        println!("{json}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => SchedulerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SchedulerConfig::default(),
    };
    info!(strategy = %config.conflict_strategy, hour_width_px = config.hour_width_px, "[CLI] config loaded");

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => sim::run_demo(&config)?,
        Command::Conflicts { fleet, strategy } => {
            let fleet = load_fleet(fleet.as_ref())?;
            sim::run_conflicts(fleet, strategy.unwrap_or(config.conflict_strategy))?;
        }
        Command::Inspect { mission_id, fleet } => {
            let fleet = load_fleet(fleet.as_ref())?;
            inspect(&config, fleet, &mission_id)?;
        }
        Command::Bench {
            lanes,
            missions_per_lane,
            iterations,
            strategy,
        } => sim::run_benchmark(
            lanes,
            missions_per_lane,
            iterations,
            strategy.unwrap_or(config.conflict_strategy),
        )?,
        Command::Stress {
            lane_sets,
            mission_sets,
            iterations,
        } => {
            let lane_sets = parse_set("lane_sets", lane_sets.as_deref())?;
            let mission_sets = parse_set("mission_sets", mission_sets.as_deref())?;
            sim::run_stress(lane_sets, mission_sets, iterations)?;
        }
    }
    Ok(())
}
