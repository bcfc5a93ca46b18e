//! Shared identifiers and the robot/mission model used across the scheduler.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a robot lane.
pub type RobotId = String;
/// Unique identifier for a scheduled mission.
pub type MissionId = String;

/// Last hour a mission may start at.
pub const LAST_START_HOUR: i64 = 23;
/// Hours shown on one timeline row.
pub const HOURS_PER_DAY: u32 = 24;

/// Kind of work a robot is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotCategory {
    Pruning,
    Transport,
    Inspection,
    Maintenance,
}

impl fmt::Display for RobotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pruning => "Pruning",
            Self::Transport => "Transport",
            Self::Inspection => "Inspection",
            Self::Maintenance => "Maintenance",
        };
        f.write_str(label)
    }
}

/// Kind of task a mission performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionCategory {
    Pruning,
    Transport,
    Inspection,
    Maintenance,
}

impl fmt::Display for MissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pruning => "pruning",
            Self::Transport => "transport",
            Self::Inspection => "inspection",
            Self::Maintenance => "maintenance",
        };
        f.write_str(label)
    }
}

/// Scalar value carried in a mission's parameter bag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Display-only parameters attached to a mission, ordered by key.
pub type Parameters = BTreeMap<String, ParamValue>;

/// A robot and the lane it owns on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub name: String,
    pub category: RobotCategory,
}

impl Robot {
    pub fn new(id: impl Into<RobotId>, name: impl Into<String>, category: RobotCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
        }
    }
}

/// Time-boxed task assigned to exactly one robot lane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: MissionId,
    pub robot_id: RobotId,
    pub name: String,
    pub category: MissionCategory,
    /// Always within `0..=23` once owned by a timeline.
    pub start_hour: u32,
    pub duration_hours: u32,
    #[serde(default)]
    pub parameters: Parameters,
}

impl Mission {
    /// Construct a mission with an empty parameter bag.
    pub fn new(
        id: impl Into<MissionId>,
        robot_id: impl Into<RobotId>,
        name: impl Into<String>,
        category: MissionCategory,
        start_hour: u32,
        duration_hours: u32,
    ) -> Self {
        Self {
            id: id.into(),
            robot_id: robot_id.into(),
            name: name.into(),
            category,
            start_hour,
            duration_hours,
            parameters: Parameters::new(),
        }
    }

    /// Attach a display parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Exclusive end of the mission's `[start, end)` interval. May exceed 24.
    pub fn end_hour(&self) -> u32 {
        self.start_hour.saturating_add(self.duration_hours)
    }

    /// Half-open interval overlap with another mission, ignoring lanes.
    pub fn overlaps(&self, other: &Mission) -> bool {
        self.start_hour < other.end_hour() && other.start_hour < self.end_hour()
    }
}

/// Clamp an arbitrary hour into the valid start range.
pub fn clamp_start_hour(hour: i64) -> u32 {
    hour.clamp(0, LAST_START_HOUR) as u32
}

/// Temporal overlap between two missions on the same lane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Mission that starts first in sorted lane order.
    pub earlier: MissionId,
    /// Mission that overlaps it.
    pub later: MissionId,
    pub robot_id: RobotId,
    pub message: String,
}

impl Conflict {
    pub fn involves(&self, mission_id: &str) -> bool {
        self.earlier == mission_id || self.later == mission_id
    }

    /// The other party of the conflict, if `mission_id` is one of them.
    pub fn counterpart(&self, mission_id: &str) -> Option<&str> {
        if self.earlier == mission_id {
            Some(&self.later)
        } else if self.later == mission_id {
            Some(&self.earlier)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_hour_may_run_past_midnight() {
        let mission = Mission::new("M1", "ARM-01", "Late", MissionCategory::Pruning, 23, 3);
        assert_eq!(mission.end_hour(), 26);
    }

    #[test]
    fn end_hour_saturates_on_huge_duration() {
        let long = Mission::new("A", "R", "a", MissionCategory::Pruning, 1, u32::MAX);
        let short = Mission::new("B", "R", "b", MissionCategory::Pruning, 3, 1);
        assert_eq!(long.end_hour(), u32::MAX);
        assert!(long.overlaps(&short));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = Mission::new("A", "R", "a", MissionCategory::Transport, 6, 2);
        let b = Mission::new("B", "R", "b", MissionCategory::Transport, 8, 1);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn clamp_start_hour_bounds() {
        assert_eq!(clamp_start_hour(-5), 0);
        assert_eq!(clamp_start_hour(30), 23);
        assert_eq!(clamp_start_hour(12), 12);
    }

    #[test]
    fn params_deserialize_as_closed_variants() {
        let json = r#"{"capacity": 50, "intensity": "high", "night": true}"#;
        let params: Parameters = serde_json::from_str(json).expect("parse params");
        assert_eq!(params["capacity"], ParamValue::Number(50.0));
        assert_eq!(params["intensity"], ParamValue::Text("high".into()));
        assert_eq!(params["night"], ParamValue::Flag(true));
    }

    #[test]
    fn counterpart_reports_other_party() {
        let conflict = Conflict {
            earlier: "M1".into(),
            later: "M2".into(),
            robot_id: "ARM-01".into(),
            message: "Overlaps with b".into(),
        };
        assert_eq!(conflict.counterpart("M1"), Some("M2"));
        assert_eq!(conflict.counterpart("M2"), Some("M1"));
        assert_eq!(conflict.counterpart("M3"), None);
    }
}
