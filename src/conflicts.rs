//! Same-lane overlap detection for scheduled missions.
//!
//! Detection is a pure read over the mission list and is recomputed from
//! scratch after every change. Lanes hold tens of missions, so there is no
//! caching or incremental maintenance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Conflict, Mission};

/// How missions inside one lane are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Compare each mission with every later one until a later mission
    /// starts at or after its end.
    #[default]
    SweepLine,
    /// Compare neighbours in start order only. Misses an overlap between
    /// `i` and `i + 2` when `i + 1` is nested inside `i` without reaching
    /// `i + 2`; kept for parity with the original console.
    AdjacentPairs,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SweepLine => f.write_str("sweep_line"),
            Self::AdjacentPairs => f.write_str("adjacent_pairs"),
        }
    }
}

impl FromStr for ConflictStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sweep_line" | "sweep" => Ok(Self::SweepLine),
            "adjacent_pairs" | "adjacent" => Ok(Self::AdjacentPairs),
            other => Err(format!("unknown conflict strategy: {other}")),
        }
    }
}

/// Conflict detector bound to one comparison strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConflictDetector {
    strategy: ConflictStrategy,
}

impl ConflictDetector {
    pub fn new(strategy: ConflictStrategy) -> Self {
        Self { strategy }
    }

    /// Detect conflicts with lanes visited in order of first appearance.
    pub fn detect(&self, missions: &[Mission]) -> Vec<Conflict> {
        let mut lane_order: Vec<&str> = Vec::new();
        for mission in missions {
            if !lane_order.contains(&mission.robot_id.as_str()) {
                lane_order.push(&mission.robot_id);
            }
        }
        self.detect_in_lanes(lane_order, missions)
    }

    /// Detect conflicts with lanes visited in the given order.
    ///
    /// Missions on lanes absent from `lanes` are not examined.
    pub fn detect_in_lanes<'a, I>(&self, lanes: I, missions: &[Mission]) -> Vec<Conflict>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut conflicts = Vec::new();
        for lane in lanes {
            let mut lane_missions: Vec<&Mission> = missions
                .iter()
                .filter(|mission| mission.robot_id == lane)
                .collect();
            if lane_missions.len() < 2 {
                continue;
            }
            // Stable: equal start hours keep their original order.
            lane_missions.sort_by_key(|mission| mission.start_hour);
            match self.strategy {
                ConflictStrategy::AdjacentPairs => adjacent_pairs(&lane_missions, &mut conflicts),
                ConflictStrategy::SweepLine => sweep_line(&lane_missions, &mut conflicts),
            }
        }
        conflicts
    }
}

/// Detect conflicts using the default sweep-line strategy.
pub fn detect_conflicts(missions: &[Mission]) -> Vec<Conflict> {
    ConflictDetector::default().detect(missions)
}

/// Conflicts in which `mission_id` takes part on either side.
pub fn conflicts_involving<'a>(conflicts: &'a [Conflict], mission_id: &str) -> Vec<&'a Conflict> {
    conflicts
        .iter()
        .filter(|conflict| conflict.involves(mission_id))
        .collect()
}

fn adjacent_pairs(sorted: &[&Mission], out: &mut Vec<Conflict>) {
    for pair in sorted.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if current.end_hour() > next.start_hour {
            out.push(conflict_between(current, next));
        }
    }
}

fn sweep_line(sorted: &[&Mission], out: &mut Vec<Conflict>) {
    for (index, current) in sorted.iter().enumerate() {
        for later in &sorted[index + 1..] {
            if later.start_hour >= current.end_hour() {
                break;
            }
            out.push(conflict_between(current, later));
        }
    }
}

fn conflict_between(earlier: &Mission, later: &Mission) -> Conflict {
    Conflict {
        earlier: earlier.id.clone(),
        later: later.id.clone(),
        robot_id: earlier.robot_id.clone(),
        message: format!("Overlaps with {}", later.name),
    }
}
