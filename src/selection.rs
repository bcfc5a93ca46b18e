//! Selected mission tracking and the read-only inspector view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::conflicts::conflicts_involving;
use crate::timeline::Timeline;
use crate::types::{Conflict, MissionCategory, MissionId, Parameters};

/// Which mission the inspector shows. Set on pointer-down, kept after the drag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<MissionId>,
}

impl Selection {
    pub fn select(&mut self, mission_id: impl Into<MissionId>) {
        self.selected = Some(mission_id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Build the inspector for the current selection.
    ///
    /// `None` when nothing is selected or the id is no longer on the timeline.
    pub fn inspect(&self, timeline: &Timeline, conflicts: &[Conflict]) -> Option<Inspector> {
        let mission = timeline.mission(self.selected()?)?;
        let robot_name = timeline
            .robot(&mission.robot_id)
            .map(|robot| robot.name.clone())
            .unwrap_or_else(|| mission.robot_id.clone());
        let warnings = conflicts_involving(conflicts, &mission.id)
            .into_iter()
            .filter_map(|conflict| {
                let with = conflict.counterpart(&mission.id)?;
                let with_name = timeline
                    .mission(with)
                    .map(|other| other.name.clone())
                    .unwrap_or_else(|| with.to_string());
                Some(ConflictWarning {
                    with: with.to_string(),
                    message: format!("Overlaps with {with_name}"),
                    with_name,
                })
            })
            .collect();
        Some(Inspector {
            mission_id: mission.id.clone(),
            robot_id: mission.robot_id.clone(),
            robot_name,
            name: mission.name.clone(),
            category: mission.category,
            start_hour: mission.start_hour,
            duration_hours: mission.duration_hours,
            end_hour: mission.end_hour(),
            parameters: mission.parameters.clone(),
            conflicts: warnings,
        })
    }
}

/// One conflict as seen from the selected mission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictWarning {
    /// The other mission in the overlap.
    pub with: MissionId,
    pub with_name: String,
    /// Names the other mission, never the selected one.
    pub message: String,
}

/// Detail panel contents for the selected mission.
#[derive(Clone, Debug, PartialEq)]
pub struct Inspector {
    pub mission_id: MissionId,
    pub robot_id: String,
    pub robot_name: String,
    pub name: String,
    pub category: MissionCategory,
    pub start_hour: u32,
    pub duration_hours: u32,
    pub end_hour: u32,
    pub parameters: Parameters,
    pub conflicts: Vec<ConflictWarning>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MissionPreview<'a> {
    id: &'a str,
    robot_id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    category: MissionCategory,
    schedule: SchedulePreview,
    parameters: &'a Parameters,
    metadata: PreviewMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePreview {
    date: NaiveDate,
    start_hour: u32,
    duration: u32,
    end_hour: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewMetadata {
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl Inspector {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Pretty JSON export of the mission as scheduled on `date`.
    pub fn json_preview(&self, date: NaiveDate, now: DateTime<Utc>) -> serde_json::Result<String> {
        let preview = MissionPreview {
            id: &self.mission_id,
            robot_id: &self.robot_id,
            name: &self.name,
            category: self.category,
            schedule: SchedulePreview {
                date,
                start_hour: self.start_hour,
                duration: self.duration_hours,
                end_hour: self.end_hour,
            },
            parameters: &self.parameters,
            metadata: PreviewMetadata {
                created: now,
                last_modified: now,
            },
        };
        serde_json::to_string_pretty(&preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::detect_conflicts;
    use crate::types::{Mission, Robot, RobotCategory};
    use chrono::TimeZone;

    fn timeline() -> Timeline {
        Timeline::new(
            vec![Robot::new("ARM-01", "Pruning Robot Alpha", RobotCategory::Pruning)],
            vec![
                Mission::new("M1", "ARM-01", "Pruning A3", MissionCategory::Pruning, 6, 2)
                    .with_param("intensity", "medium"),
                Mission::new("M2", "ARM-01", "Pruning B1", MissionCategory::Pruning, 7, 3),
                Mission::new("M3", "ARM-01", "Pruning C4", MissionCategory::Pruning, 20, 1),
            ],
        )
        .expect("valid timeline")
    }

    #[test]
    fn nothing_selected_means_no_inspector() {
        let timeline = timeline();
        let selection = Selection::default();
        assert!(selection.inspect(&timeline, &[]).is_none());
    }

    #[test]
    fn later_party_sees_the_conflict_too() {
        let timeline = timeline();
        let conflicts = detect_conflicts(timeline.missions());
        let mut selection = Selection::default();

        selection.select("M2");
        let inspector = selection.inspect(&timeline, &conflicts).expect("inspector");
        assert_eq!(inspector.robot_name, "Pruning Robot Alpha");
        assert_eq!(
            inspector.conflicts,
            [ConflictWarning {
                with: "M1".into(),
                with_name: "Pruning A3".into(),
                message: "Overlaps with Pruning A3".into(),
            }]
        );

        selection.select("M1");
        let inspector = selection.inspect(&timeline, &conflicts).expect("inspector");
        assert_eq!(inspector.conflicts[0].with, "M2");
        assert_eq!(inspector.conflicts[0].message, "Overlaps with Pruning B1");

        selection.select("M3");
        let inspector = selection.inspect(&timeline, &conflicts).expect("inspector");
        assert!(!inspector.has_conflicts());
    }

    #[test]
    fn clear_drops_selection() {
        let mut selection = Selection::default();
        selection.select("M1");
        selection.clear();
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn json_preview_has_schedule_block() {
        let timeline = timeline();
        let mut selection = Selection::default();
        selection.select("M1");
        let inspector = selection.inspect(&timeline, &[]).expect("inspector");
        let date = NaiveDate::from_ymd_opt(2024, 12, 15).expect("date");
        let now = Utc.with_ymd_and_hms(2024, 12, 15, 8, 0, 0).unwrap();
        let json = inspector.json_preview(date, now).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["robotId"], "ARM-01");
        assert_eq!(value["type"], "pruning");
        assert_eq!(value["schedule"]["date"], "2024-12-15");
        assert_eq!(value["schedule"]["endHour"], 8);
        assert_eq!(value["parameters"]["intensity"], "medium");
        assert_eq!(value["metadata"]["created"], "2024-12-15T08:00:00Z");
    }
}
