//! Fleet documents: the robots and missions a timeline starts from.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};
use crate::timeline::Timeline;
use crate::types::{Mission, MissionCategory, Robot, RobotCategory};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub robots: Vec<Robot>,
    #[serde(default)]
    pub missions: Vec<Mission>,
}

impl Fleet {
    /// Greenhouse fleet shown by the console out of the box.
    pub fn sample() -> Self {
        let robots = vec![
            Robot::new("ARM-01", "Pruning Robot Alpha", RobotCategory::Pruning),
            Robot::new("TRP-02", "Transport Robot Beta", RobotCategory::Transport),
            Robot::new("INS-03", "Inspection Robot Gamma", RobotCategory::Inspection),
            Robot::new("MNT-04", "Maintenance Robot Delta", RobotCategory::Maintenance),
        ];
        let missions = vec![
            Mission::new("M001", "ARM-01", "Pruning A3", MissionCategory::Pruning, 6, 2)
                .with_param("intensity", "medium")
                .with_param("zone", "A3"),
            Mission::new("M002", "ARM-01", "Pruning B1", MissionCategory::Pruning, 14, 3)
                .with_param("intensity", "high")
                .with_param("zone", "B1"),
            Mission::new("M003", "TRP-02", "Transport B2 → Dock", MissionCategory::Transport, 8, 1)
                .with_param("capacity", 50.0)
                .with_param("from", "B2")
                .with_param("to", "Dock"),
            Mission::new("M004", "TRP-02", "Supply Run", MissionCategory::Transport, 16, 2)
                .with_param("capacity", 75.0)
                .with_param("from", "Storage")
                .with_param("to", "A1"),
            Mission::new("M005", "INS-03", "Quality Check C2", MissionCategory::Inspection, 9, 1)
                .with_param("checkType", "visual")
                .with_param("zone", "C2"),
            Mission::new("M006", "INS-03", "Health Scan", MissionCategory::Inspection, 18, 2)
                .with_param("checkType", "sensor")
                .with_param("zone", "All"),
            Mission::new("M007", "MNT-04", "System Check", MissionCategory::Maintenance, 2, 1)
                .with_param("checkType", "routine")
                .with_param("target", "Rails"),
        ];
        Self { robots, missions }
    }

    pub fn from_json_str(content: &str) -> SchedulerResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SchedulerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchedulerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Validate ids and lane references and hand the data to a timeline.
    pub fn into_timeline(self) -> SchedulerResult<Timeline> {
        Timeline::new(self.robots, self.missions)
    }
}
