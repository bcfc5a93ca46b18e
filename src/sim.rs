//! Scripted demo, benchmark, and stress runners for the scheduler CLI.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::conflicts::{ConflictDetector, ConflictStrategy};
use crate::error::{SchedulerError, SchedulerResult};
use crate::fleet::Fleet;
use crate::session::SchedulerSession;
use crate::timeline::Timeline;
use crate::types::{Mission, MissionCategory, Robot, RobotCategory};

// Defaults for bench/stress (small enough for quick CLI feedback).
const DEFAULT_LANES: usize = 4;
const DEFAULT_MISSIONS_PER_LANE: usize = 50;
const DEFAULT_ITERATIONS: usize = 200;

const CSV_HEADER: &str = "lanes,missions_per_lane,total_missions,strategy,iterations,elapsed_ms,avg_detect_us,cpu_user_s,cpu_sys_s,conflicts,missed_by_adjacent";

/// Best-effort CPU user/system time snapshot (seconds) on Unix platforms.
#[cfg(unix)]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    use libc::{RUSAGE_SELF, getrusage, rusage, timeval};
    let mut usage = rusage {
        ru_utime: timeval {
            tv_sec: 0,
            tv_usec: 0,
        },
        ru_stime: timeval {
            tv_sec: 0,
            tv_usec: 0,
        },
        ru_maxrss: 0,
        ru_ixrss: 0,
        ru_idrss: 0,
        ru_isrss: 0,
        ru_minflt: 0,
        ru_majflt: 0,
        ru_nswap: 0,
        ru_inblock: 0,
        ru_oublock: 0,
        ru_msgsnd: 0,
        ru_msgrcv: 0,
        ru_nsignals: 0,
        ru_nvcsw: 0,
        ru_nivcsw: 0,
    };
    let rc = unsafe { getrusage(RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    let user = usage.ru_utime.tv_sec as f64 + (usage.ru_utime.tv_usec as f64 / 1_000_000.0);
    let sys = usage.ru_stime.tv_sec as f64 + (usage.ru_stime.tv_usec as f64 / 1_000_000.0);
    Some((user, sys))
}

/// Stub on non-Unix platforms.
#[cfg(not(unix))]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    None
}

const CATEGORIES: [(RobotCategory, MissionCategory); 4] = [
    (RobotCategory::Pruning, MissionCategory::Pruning),
    (RobotCategory::Transport, MissionCategory::Transport),
    (RobotCategory::Inspection, MissionCategory::Inspection),
    (RobotCategory::Maintenance, MissionCategory::Maintenance),
];

/// Deterministic dense timeline; lanes are heavily overbooked on purpose.
pub fn generate_timeline(lanes: usize, missions_per_lane: usize) -> SchedulerResult<Timeline> {
    let mut robots = Vec::with_capacity(lanes);
    let mut missions = Vec::with_capacity(lanes * missions_per_lane);
    for lane in 0..lanes {
        let (robot_category, mission_category) = CATEGORIES[lane % CATEGORIES.len()];
        let robot_id = format!("R-{lane:03}");
        robots.push(Robot::new(
            robot_id.clone(),
            format!("Bench Robot {lane}"),
            robot_category,
        ));
        for index in 0..missions_per_lane {
            let start = ((index * 5 + lane * 3) % 24) as u32;
            let duration = (1 + (index * 7 + lane) % 4) as u32;
            missions.push(Mission::new(
                format!("{robot_id}-M{index:04}"),
                robot_id.clone(),
                format!("bench-{lane}-{index}"),
                mission_category,
                start,
                duration,
            ));
        }
    }
    Timeline::new(robots, missions)
}

/// Aggregated metrics from a single benchmark run.
struct BenchResult {
    lanes: usize,
    missions_per_lane: usize,
    total_missions: usize,
    strategy: ConflictStrategy,
    iterations: usize,
    elapsed_ms: f64,
    avg_detect_us: f64,
    cpu_user_s: Option<f64>,
    cpu_sys_s: Option<f64>,
    conflicts: usize,
    missed_by_adjacent: usize,
}

impl BenchResult {
    fn csv_row(&self) -> String {
        let cpu_user = self
            .cpu_user_s
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "NA".to_string());
        let cpu_sys = self
            .cpu_sys_s
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "NA".to_string());
        format!(
            "{},{},{},{},{},{:.2},{:.2},{},{},{},{}",
            self.lanes,
            self.missions_per_lane,
            self.total_missions,
            self.strategy,
            self.iterations,
            self.elapsed_ms,
            self.avg_detect_us,
            cpu_user,
            cpu_sys,
            self.conflicts,
            self.missed_by_adjacent
        )
    }
}

fn benchmark_once(
    lanes: usize,
    missions_per_lane: usize,
    strategy: ConflictStrategy,
    iterations: usize,
) -> SchedulerResult<BenchResult> {
    debug_assert!(iterations > 0, "iterations must be > 0");
    let timeline = generate_timeline(lanes, missions_per_lane)?;
    let lane_ids: Vec<&str> = timeline.robots().iter().map(|robot| robot.id.as_str()).collect();
    let detector = ConflictDetector::new(strategy);

    let cpu_start = cpu_times_seconds();
    let start = Instant::now();
    let mut conflicts = 0usize;
    for _ in 0..iterations {
        conflicts = detector
            .detect_in_lanes(lane_ids.iter().copied(), timeline.missions())
            .len();
    }
    let elapsed = start.elapsed();
    let (cpu_user_s, cpu_sys_s) = match (cpu_start, cpu_times_seconds()) {
        (Some((user_start, sys_start)), Some((user_end, sys_end))) => {
            (Some(user_end - user_start), Some(sys_end - sys_start))
        }
        _ => (None, None),
    };

    let sweep = ConflictDetector::new(ConflictStrategy::SweepLine)
        .detect_in_lanes(lane_ids.iter().copied(), timeline.missions())
        .len();
    let adjacent = ConflictDetector::new(ConflictStrategy::AdjacentPairs)
        .detect_in_lanes(lane_ids.iter().copied(), timeline.missions())
        .len();

    Ok(BenchResult {
        lanes,
        missions_per_lane,
        total_missions: timeline.missions().len(),
        strategy,
        iterations,
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        avg_detect_us: elapsed.as_secs_f64() * 1_000_000.0 / iterations as f64,
        cpu_user_s,
        cpu_sys_s,
        conflicts,
        missed_by_adjacent: sweep.saturating_sub(adjacent),
    })
}

/// Outcome of the scripted demo, printed as `DEMO SUMMARY`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoSummary {
    pub robots: usize,
    pub missions: usize,
    pub conflicts_before: usize,
    pub conflicts_peak: usize,
    pub conflicts_after: usize,
    pub overlay_intercepted: bool,
    pub selected: Option<String>,
    pub utilization_percent: u32,
    pub events: Vec<String>,
}

/// Drive the sample fleet through a scripted drag session.
///
/// One drag creates a conflict, an overlay swallows a click, a second drag is
/// cancelled, and a final drag resolves the conflict.
pub fn demo_session(config: &SchedulerConfig) -> SchedulerResult<DemoSummary> {
    let timeline = Fleet::sample().into_timeline()?;
    let mut session = SchedulerSession::new(timeline, config);
    let hour = config.hour_width_px;
    let conflicts_before = session.conflicts().len();
    let mut conflicts_peak = conflicts_before;

    // Pruning A3 (06:00) dragged onto Pruning B1's slot.
    let grab = 6.0 * hour + hour / 3.0;
    session.pointer_down("M001", grab);
    session.pointer_move(grab + 9.0 * hour);
    conflicts_peak = conflicts_peak.max(session.conflicts().len());
    session.pointer_up();
    if let Some(inspector) = session.inspector() {
        for warning in &inspector.conflicts {
            debug!(with = %warning.with, "[DEMO] {} {}", inspector.name, warning.message);
        }
    }

    session.open_overlay();
    let overlay_intercepted = !session.pointer_down("M004", 16.0 * hour);

    // Supply Run pulled onto the dock transport, then abandoned.
    session.pointer_down("M004", 16.0 * hour);
    session.pointer_move(8.0 * hour);
    conflicts_peak = conflicts_peak.max(session.conflicts().len());
    session.cancel_drag();

    // Pruning A3 moved clear of Pruning B1.
    let grab = 15.0 * hour + hour / 2.0;
    session.pointer_down("M001", grab);
    session.pointer_move(grab - 4.0 * hour);
    session.pointer_up();

    let metrics = session.metrics();
    Ok(DemoSummary {
        robots: session.timeline().robots().len(),
        missions: metrics.scheduled,
        conflicts_before,
        conflicts_peak,
        conflicts_after: metrics.conflicts,
        overlay_intercepted,
        selected: session.selected().map(str::to_string),
        utilization_percent: metrics.utilization_percent,
        events: session
            .event_log()
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

/// Run the default demo and print its summary.
pub fn run_demo(config: &SchedulerConfig) -> SchedulerResult<()> {
    info!("[DEMO] start");
    let start = Instant::now();
    let summary = demo_session(config)?;
    info!("[DEMO] finished in {}ms", start.elapsed().as_millis());

    println!("DEMO SUMMARY");
    println!("robots={} missions={}", summary.robots, summary.missions);
    println!("conflicts_before={}", summary.conflicts_before);
    println!("conflicts_peak={}", summary.conflicts_peak);
    println!("conflicts_after={}", summary.conflicts_after);
    println!("overlay_intercepted={}", summary.overlay_intercepted);
    println!("reschedules={}", summary.events.len());
    println!("selected={}", summary.selected.as_deref().unwrap_or("-"));
    println!("utilization_percent={}", summary.utilization_percent);
    for event in &summary.events {
        println!("event: {event}");
    }
    Ok(())
}

/// Print every conflict of a fleet, one per line.
pub fn run_conflicts(fleet: Fleet, strategy: ConflictStrategy) -> SchedulerResult<usize> {
    let timeline = fleet.into_timeline()?;
    let lanes = timeline.robots().iter().map(|robot| robot.id.as_str());
    let conflicts = ConflictDetector::new(strategy).detect_in_lanes(lanes, timeline.missions());
    for conflict in &conflicts {
        println!(
            "{}: {} -> {} ({})",
            conflict.robot_id, conflict.earlier, conflict.later, conflict.message
        );
    }
    println!("conflicts={}", conflicts.len());
    Ok(conflicts.len())
}

fn ensure_positive(name: &str, values: &[usize]) -> SchedulerResult<()> {
    if values.iter().any(|&value| value == 0) {
        return Err(SchedulerError::InvalidConfig(format!("{name} must be > 0")));
    }
    Ok(())
}

/// Run a single benchmark with optional parameter overrides.
pub fn run_benchmark(
    lanes: Option<usize>,
    missions_per_lane: Option<usize>,
    iterations: Option<usize>,
    strategy: ConflictStrategy,
) -> SchedulerResult<()> {
    let lanes = lanes.unwrap_or(DEFAULT_LANES);
    let missions_per_lane = missions_per_lane.unwrap_or(DEFAULT_MISSIONS_PER_LANE);
    let iterations = iterations.unwrap_or(DEFAULT_ITERATIONS);
    ensure_positive("lanes", &[lanes])?;
    ensure_positive("missions_per_lane", &[missions_per_lane])?;
    ensure_positive("iterations", &[iterations])?;

    let result = benchmark_once(lanes, missions_per_lane, strategy, iterations)?;
    println!("{CSV_HEADER}");
    println!("{}", result.csv_row());
    if result.missed_by_adjacent > 0 && strategy == ConflictStrategy::AdjacentPairs {
        eprintln!("# warning,missed_conflicts,{}", result.missed_by_adjacent);
    }
    Ok(())
}

/// Sweep multiple benchmark configurations and print CSV output.
pub fn run_stress(
    lane_sets: Option<Vec<usize>>,
    mission_sets: Option<Vec<usize>>,
    iterations: Option<usize>,
) -> SchedulerResult<()> {
    let lane_sets = lane_sets.unwrap_or_else(|| vec![1, 4, 16]);
    let mission_sets = mission_sets.unwrap_or_else(|| vec![10, 50, 200]);
    let iterations = iterations.unwrap_or(DEFAULT_ITERATIONS / 4);
    ensure_positive("lane_sets", &lane_sets)?;
    ensure_positive("mission_sets", &mission_sets)?;
    ensure_positive("iterations", &[iterations])?;

    println!("{CSV_HEADER}");
    for lanes in lane_sets {
        for missions_per_lane in mission_sets.iter().copied() {
            for strategy in [ConflictStrategy::SweepLine, ConflictStrategy::AdjacentPairs] {
                let result = benchmark_once(lanes, missions_per_lane, strategy, iterations)?;
                println!("{}", result.csv_row());
            }
        }
    }
    Ok(())
}
