//! Robot lanes and the mission list they own.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{SchedulerError, SchedulerResult};
use crate::types::{Mission, Robot, clamp_start_hour};

/// Owns the robots (fixed lanes) and every scheduled mission.
///
/// Missions keep their insertion order; nothing here re-sorts them.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    robots: Vec<Robot>,
    missions: Vec<Mission>,
}

impl Timeline {
    /// Build a timeline after checking ids and lane references.
    ///
    /// Start hours outside `0..=23` are clamped rather than rejected.
    pub fn new(robots: Vec<Robot>, missions: Vec<Mission>) -> SchedulerResult<Self> {
        let mut robot_ids = HashSet::new();
        for robot in &robots {
            if !robot_ids.insert(robot.id.as_str()) {
                return Err(SchedulerError::DuplicateRobot {
                    robot_id: robot.id.clone(),
                });
            }
        }

        let mut mission_ids = HashSet::new();
        for mission in &missions {
            if !mission_ids.insert(mission.id.as_str()) {
                return Err(SchedulerError::DuplicateMission {
                    mission_id: mission.id.clone(),
                });
            }
            if !robot_ids.contains(mission.robot_id.as_str()) {
                return Err(SchedulerError::UnknownRobot {
                    mission_id: mission.id.clone(),
                    robot_id: mission.robot_id.clone(),
                });
            }
            if mission.duration_hours == 0 {
                return Err(SchedulerError::ZeroDuration {
                    mission_id: mission.id.clone(),
                });
            }
        }

        let missions = missions
            .into_iter()
            .map(|mut mission| {
                mission.start_hour = clamp_start_hour(i64::from(mission.start_hour));
                mission
            })
            .collect();

        Ok(Self { robots, missions })
    }

    /// Robots in lane order.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// All missions in insertion order.
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn robot(&self, robot_id: &str) -> Option<&Robot> {
        self.robots.iter().find(|robot| robot.id == robot_id)
    }

    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions.iter().find(|mission| mission.id == mission_id)
    }

    /// Missions on one lane, in insertion order.
    pub fn list_missions_for_robot(&self, robot_id: &str) -> Vec<&Mission> {
        self.missions
            .iter()
            .filter(|mission| mission.robot_id == robot_id)
            .collect()
    }

    /// Move a mission to a new start hour, clamped into `0..=23`.
    ///
    /// Unknown ids are ignored. Returns the stored hour when a mission was
    /// updated.
    pub fn set_mission_start_hour(&mut self, mission_id: &str, new_start_hour: i64) -> Option<u32> {
        let hour = clamp_start_hour(new_start_hour);
        match self.missions.iter_mut().find(|mission| mission.id == mission_id) {
            Some(mission) => {
                mission.start_hour = hour;
                Some(hour)
            }
            None => {
                debug!(mission_id, "[TIMELINE] ignoring start hour update for unknown mission");
                None
            }
        }
    }

    /// Sum of all mission durations in hours.
    pub fn scheduled_hours(&self) -> u32 {
        self.missions
            .iter()
            .fold(0u32, |total, mission| total.saturating_add(mission.duration_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MissionCategory, RobotCategory};

    fn timeline() -> Timeline {
        Timeline::new(
            vec![
                Robot::new("ARM-01", "Pruning Robot Alpha", RobotCategory::Pruning),
                Robot::new("TRP-02", "Transport Robot Beta", RobotCategory::Transport),
            ],
            vec![
                Mission::new("M1", "ARM-01", "Pruning A3", MissionCategory::Pruning, 6, 2),
                Mission::new("M2", "TRP-02", "Supply Run", MissionCategory::Transport, 16, 2),
                Mission::new("M3", "ARM-01", "Pruning B1", MissionCategory::Pruning, 3, 3),
            ],
        )
        .expect("valid timeline")
    }

    #[test]
    fn lane_listing_keeps_insertion_order() {
        let timeline = timeline();
        let ids: Vec<&str> = timeline
            .list_missions_for_robot("ARM-01")
            .iter()
            .map(|mission| mission.id.as_str())
            .collect();
        // M3 starts earlier but stays after M1.
        assert_eq!(ids, ["M1", "M3"]);
        assert!(timeline.list_missions_for_robot("NOPE").is_empty());
    }

    #[test]
    fn start_hour_is_clamped() {
        let mut timeline = timeline();
        assert_eq!(timeline.set_mission_start_hour("M1", -5), Some(0));
        assert_eq!(timeline.mission("M1").map(|m| m.start_hour), Some(0));
        assert_eq!(timeline.set_mission_start_hour("M1", 30), Some(23));
        assert_eq!(timeline.mission("M1").map(|m| m.start_hour), Some(23));
    }

    #[test]
    fn duration_is_kept_when_clamped_to_last_hour() {
        let mut timeline = timeline();
        timeline.set_mission_start_hour("M3", 40);
        let mission = timeline.mission("M3").expect("mission");
        assert_eq!(mission.duration_hours, 3);
        assert_eq!(mission.end_hour(), 26);
    }

    #[test]
    fn unknown_mission_update_is_a_no_op() {
        let mut timeline = timeline();
        let before = timeline.clone();
        assert_eq!(timeline.set_mission_start_hour("does-not-exist", 5), None);
        assert_eq!(timeline, before);
    }

    #[test]
    fn rejects_duplicate_mission_ids() {
        let err = Timeline::new(
            vec![Robot::new("R", "r", RobotCategory::Inspection)],
            vec![
                Mission::new("M", "R", "a", MissionCategory::Inspection, 1, 1),
                Mission::new("M", "R", "b", MissionCategory::Inspection, 2, 1),
            ],
        )
        .expect_err("duplicate ids");
        assert!(matches!(err, SchedulerError::DuplicateMission { .. }));
    }

    #[test]
    fn rejects_unknown_lane_and_zero_duration() {
        let robots = vec![Robot::new("R", "r", RobotCategory::Inspection)];
        let err = Timeline::new(
            robots.clone(),
            vec![Mission::new("M", "X", "a", MissionCategory::Inspection, 1, 1)],
        )
        .expect_err("unknown lane");
        assert!(matches!(err, SchedulerError::UnknownRobot { .. }));

        let err = Timeline::new(
            robots,
            vec![Mission::new("M", "R", "a", MissionCategory::Inspection, 1, 0)],
        )
        .expect_err("zero duration");
        assert!(matches!(err, SchedulerError::ZeroDuration { .. }));
    }

    #[test]
    fn input_start_hours_are_clamped_on_load() {
        let timeline = Timeline::new(
            vec![Robot::new("R", "r", RobotCategory::Maintenance)],
            vec![Mission::new("M", "R", "a", MissionCategory::Maintenance, 99, 1)],
        )
        .expect("valid");
        assert_eq!(timeline.mission("M").map(|m| m.start_hour), Some(23));
    }
}
