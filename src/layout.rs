//! Projection of the timeline into what the rendering layer draws.

use serde::Serialize;

use crate::timeline::Timeline;
use crate::types::{Conflict, HOURS_PER_DAY, MissionCategory, MissionId, RobotId};

/// Pixel geometry shared by every lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneGeometry {
    pub hour_width_px: f64,
    /// Horizontal gap trimmed from each block so neighbours stay apart.
    pub block_gap_px: f64,
}

impl LaneGeometry {
    pub fn left_px(&self, start_hour: u32) -> f64 {
        f64::from(start_hour) * self.hour_width_px
    }

    pub fn width_px(&self, duration_hours: u32) -> f64 {
        f64::from(duration_hours) * self.hour_width_px - self.block_gap_px
    }
}

/// One mission block as drawn on its lane.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionBlock {
    pub mission_id: MissionId,
    pub robot_id: RobotId,
    pub name: String,
    pub category: MissionCategory,
    pub left_px: f64,
    pub width_px: f64,
    /// The mission takes part in at least one conflict.
    pub highlighted: bool,
    pub selected: bool,
    /// Tooltip text, e.g. `Pruning A3 (6:00 - 8:00)`.
    pub title: String,
}

/// A robot row with its blocks in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneView {
    pub robot_id: RobotId,
    pub robot_name: String,
    pub blocks: Vec<MissionBlock>,
}

/// Summary counters shown above the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetrics {
    pub scheduled: usize,
    pub conflicts: usize,
    /// Booked hours over lane capacity, rounded to a whole percent.
    pub utilization_percent: u32,
}

pub fn lay_out(
    timeline: &Timeline,
    conflicts: &[Conflict],
    selected: Option<&str>,
    geometry: LaneGeometry,
) -> Vec<LaneView> {
    timeline
        .robots()
        .iter()
        .map(|robot| LaneView {
            robot_id: robot.id.clone(),
            robot_name: robot.name.clone(),
            blocks: timeline
                .list_missions_for_robot(&robot.id)
                .into_iter()
                .map(|mission| MissionBlock {
                    mission_id: mission.id.clone(),
                    robot_id: mission.robot_id.clone(),
                    name: mission.name.clone(),
                    category: mission.category,
                    left_px: geometry.left_px(mission.start_hour),
                    width_px: geometry.width_px(mission.duration_hours),
                    highlighted: conflicts.iter().any(|c| c.involves(&mission.id)),
                    selected: selected == Some(mission.id.as_str()),
                    title: format!(
                        "{} ({}:00 - {}:00)",
                        mission.name,
                        mission.start_hour,
                        mission.end_hour()
                    ),
                })
                .collect(),
        })
        .collect()
}

pub fn metrics(timeline: &Timeline, conflicts: &[Conflict]) -> ScheduleMetrics {
    let capacity = timeline.robots().len() as f64 * f64::from(HOURS_PER_DAY);
    let utilization_percent = if capacity > 0.0 {
        (f64::from(timeline.scheduled_hours()) / capacity * 100.0).round() as u32
    } else {
        0
    };
    ScheduleMetrics {
        scheduled: timeline.missions().len(),
        conflicts: conflicts.len(),
        utilization_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::detect_conflicts;
    use crate::types::{Mission, Robot, RobotCategory};

    const GEOMETRY: LaneGeometry = LaneGeometry {
        hour_width_px: 60.0,
        block_gap_px: 4.0,
    };

    fn timeline() -> Timeline {
        Timeline::new(
            vec![
                Robot::new("ARM-01", "Alpha", RobotCategory::Pruning),
                Robot::new("TRP-02", "Beta", RobotCategory::Transport),
            ],
            vec![
                Mission::new("M1", "ARM-01", "Pruning A3", MissionCategory::Pruning, 6, 2),
                Mission::new("M2", "ARM-01", "Pruning B1", MissionCategory::Pruning, 7, 3),
                Mission::new("M3", "TRP-02", "Supply Run", MissionCategory::Transport, 16, 2),
            ],
        )
        .expect("valid timeline")
    }

    #[test]
    fn blocks_carry_geometry_and_flags() {
        let timeline = timeline();
        let conflicts = detect_conflicts(timeline.missions());
        let lanes = lay_out(&timeline, &conflicts, Some("M3"), GEOMETRY);

        assert_eq!(lanes.len(), 2);
        let first = &lanes[0].blocks[0];
        assert_eq!(first.left_px, 360.0);
        assert_eq!(first.width_px, 116.0);
        assert_eq!(first.title, "Pruning A3 (6:00 - 8:00)");
        // Both parties of the overlap are highlighted.
        assert!(lanes[0].blocks.iter().all(|block| block.highlighted));

        let supply = &lanes[1].blocks[0];
        assert!(!supply.highlighted);
        assert!(supply.selected);
    }

    #[test]
    fn utilization_is_rounded_percent_of_lane_hours() {
        let timeline = timeline();
        let conflicts = detect_conflicts(timeline.missions());
        // 7 booked hours over 48 lane hours.
        assert_eq!(
            metrics(&timeline, &conflicts),
            ScheduleMetrics {
                scheduled: 3,
                conflicts: 1,
                utilization_percent: 15,
            }
        );
    }

    #[test]
    fn empty_fleet_has_zero_utilization() {
        let timeline = Timeline::new(Vec::new(), Vec::new()).expect("empty");
        assert_eq!(metrics(&timeline, &[]).utilization_percent, 0);
    }
}
