//! Pointer-driven rescheduling of a single mission block.
//!
//! The controller is fed raw pointer coordinates and knows nothing about the
//! event system delivering them. Pointer-up is accepted from anywhere, so the
//! host should forward document-level moves and releases for as long as
//! [`DragController::is_dragging`] holds.

use std::fmt;

use tracing::debug;

use crate::timeline::Timeline;
use crate::types::{MissionId, clamp_start_hour};

/// Default rendered width of one hour column.
pub const DEFAULT_HOUR_WIDTH_PX: f64 = 60.0;

#[derive(Clone, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        mission_id: MissionId,
        /// Pointer x minus the block's left edge at pointer-down.
        origin_offset: f64,
        /// Start hour at pointer-down, restored by [`DragController::cancel`].
        origin_hour: u32,
    },
}

/// A completed drag that moved a mission to a different hour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RescheduleEvent {
    pub mission_id: MissionId,
    pub from_hour: u32,
    pub to_hour: u32,
}

impl fmt::Display for RescheduleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mission {} rescheduled from {:02}:00 -> {:02}:00",
            self.mission_id, self.from_hour, self.to_hour
        )
    }
}

/// Round a pixel offset to the nearest hour column, halves rounding up.
pub fn snap_to_hour(left_px: f64, hour_width_px: f64) -> i64 {
    (left_px / hour_width_px + 0.5).floor() as i64
}

/// Single global drag session: at most one mission moves at a time.
#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
    hour_width_px: f64,
}

impl DragController {
    pub fn new(hour_width_px: f64) -> Self {
        Self {
            state: DragState::Idle,
            hour_width_px,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Mission currently being dragged.
    pub fn active_mission(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { mission_id, .. } => Some(mission_id),
            DragState::Idle => None,
        }
    }

    /// Rendered left edge of a block starting at `start_hour`.
    pub fn block_left_px(&self, start_hour: u32) -> f64 {
        f64::from(start_hour) * self.hour_width_px
    }

    /// Begin dragging `mission_id`. Returns whether a drag started.
    ///
    /// Ignored while another drag is active or when the mission is unknown.
    pub fn on_pointer_down(&mut self, timeline: &Timeline, mission_id: &str, pointer_x: f64) -> bool {
        if let DragState::Dragging { mission_id: active, .. } = &self.state {
            debug!(active = %active, requested = mission_id, "[DRAG] pointer-down ignored during drag");
            return false;
        }
        let Some(mission) = timeline.mission(mission_id) else {
            debug!(mission_id, "[DRAG] pointer-down on unknown mission");
            return false;
        };
        let origin_offset = pointer_x - self.block_left_px(mission.start_hour);
        debug!(
            mission_id,
            origin_offset,
            start_hour = mission.start_hour,
            "[DRAG] start"
        );
        self.state = DragState::Dragging {
            mission_id: mission.id.clone(),
            origin_offset,
            origin_hour: mission.start_hour,
        };
        true
    }

    /// Move the dragged mission to the hour under the pointer.
    ///
    /// Returns the stored start hour, or `None` when idle.
    pub fn on_pointer_move(&mut self, timeline: &mut Timeline, pointer_x: f64) -> Option<u32> {
        let DragState::Dragging {
            mission_id,
            origin_offset,
            ..
        } = &self.state
        else {
            return None;
        };
        let new_left = pointer_x - origin_offset;
        let snapped = snap_to_hour(new_left, self.hour_width_px);
        timeline.set_mission_start_hour(mission_id, i64::from(clamp_start_hour(snapped)))
    }

    /// End the drag. Reports a reschedule when the hour changed.
    pub fn on_pointer_up(&mut self, timeline: &Timeline) -> Option<RescheduleEvent> {
        let DragState::Dragging {
            mission_id,
            origin_hour,
            ..
        } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return None;
        };
        let to_hour = timeline.mission(&mission_id)?.start_hour;
        debug!(mission_id = %mission_id, from = origin_hour, to = to_hour, "[DRAG] end");
        (to_hour != origin_hour).then_some(RescheduleEvent {
            mission_id,
            from_hour: origin_hour,
            to_hour,
        })
    }

    /// Abort the drag and put the mission back where it started.
    pub fn cancel(&mut self, timeline: &mut Timeline) -> bool {
        let DragState::Dragging {
            mission_id,
            origin_hour,
            ..
        } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return false;
        };
        debug!(mission_id = %mission_id, origin_hour, "[DRAG] cancelled");
        timeline.set_mission_start_hour(&mission_id, i64::from(origin_hour));
        true
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_HOUR_WIDTH_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mission, MissionCategory, Robot, RobotCategory};

    fn timeline() -> Timeline {
        Timeline::new(
            vec![Robot::new("ARM-01", "Alpha", RobotCategory::Pruning)],
            vec![
                Mission::new("M1", "ARM-01", "Pruning A3", MissionCategory::Pruning, 6, 2),
                Mission::new("M2", "ARM-01", "Pruning B1", MissionCategory::Pruning, 14, 3),
            ],
        )
        .expect("valid timeline")
    }

    #[test]
    fn snap_rounds_half_up() {
        assert_eq!(snap_to_hour(180.0, 60.0), 3);
        assert_eq!(snap_to_hour(29.9, 60.0), 0);
        assert_eq!(snap_to_hour(30.0, 60.0), 1);
        assert_eq!(snap_to_hour(-30.0, 60.0), 0);
        assert_eq!(snap_to_hour(-31.0, 60.0), -1);
    }

    #[test]
    fn moving_180_px_shifts_three_hours() {
        let mut timeline = timeline();
        let mut drag = DragController::default();
        // Grab the block 25px inside its left edge (6h * 60px = 360px).
        assert!(drag.on_pointer_down(&timeline, "M1", 385.0));
        assert_eq!(drag.on_pointer_move(&mut timeline, 385.0 + 180.0), Some(9));
        assert_eq!(timeline.mission("M1").map(|m| m.start_hour), Some(9));
    }

    #[test]
    fn drag_is_clamped_at_both_ends() {
        let mut timeline = timeline();
        let mut drag = DragController::default();
        drag.on_pointer_down(&timeline, "M2", 14.0 * 60.0);
        assert_eq!(drag.on_pointer_move(&mut timeline, 5_000.0), Some(23));
        assert_eq!(drag.on_pointer_move(&mut timeline, -5_000.0), Some(0));
    }

    #[test]
    fn every_move_is_applied_in_order() {
        let mut timeline = timeline();
        let mut drag = DragController::default();
        drag.on_pointer_down(&timeline, "M1", 360.0);
        let hours: Vec<_> = [300.0, 240.0, 420.0, 425.0]
            .into_iter()
            .filter_map(|x| drag.on_pointer_move(&mut timeline, x))
            .collect();
        assert_eq!(hours, [5, 4, 7, 7]);
        // Other missions are never touched.
        assert_eq!(timeline.mission("M2").map(|m| m.start_hour), Some(14));
    }

    #[test]
    fn pointer_up_reports_only_real_reschedules() {
        let mut timeline = timeline();
        let mut drag = DragController::default();

        drag.on_pointer_down(&timeline, "M1", 360.0);
        drag.on_pointer_move(&mut timeline, 370.0);
        assert_eq!(drag.on_pointer_up(&timeline), None);
        assert!(!drag.is_dragging());

        drag.on_pointer_down(&timeline, "M1", 360.0);
        drag.on_pointer_move(&mut timeline, 240.0);
        let event = drag.on_pointer_up(&timeline).expect("reschedule");
        assert_eq!(
            event,
            RescheduleEvent {
                mission_id: "M1".into(),
                from_hour: 6,
                to_hour: 4,
            }
        );
        assert_eq!(event.to_string(), "Mission M1 rescheduled from 06:00 -> 04:00");
    }

    #[test]
    fn idle_controller_ignores_move_and_up() {
        let mut timeline = timeline();
        let before = timeline.clone();
        let mut drag = DragController::default();
        assert_eq!(drag.on_pointer_move(&mut timeline, 600.0), None);
        assert_eq!(drag.on_pointer_up(&timeline), None);
        assert_eq!(timeline, before);
    }

    #[test]
    fn second_pointer_down_does_not_steal_the_drag() {
        let timeline = timeline();
        let mut drag = DragController::default();
        assert!(drag.on_pointer_down(&timeline, "M1", 360.0));
        assert!(!drag.on_pointer_down(&timeline, "M2", 840.0));
        assert_eq!(drag.active_mission(), Some("M1"));
    }

    #[test]
    fn unknown_mission_stays_idle() {
        let timeline = timeline();
        let mut drag = DragController::default();
        assert!(!drag.on_pointer_down(&timeline, "nope", 10.0));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn cancel_restores_origin_hour() {
        let mut timeline = timeline();
        let mut drag = DragController::default();
        drag.on_pointer_down(&timeline, "M1", 360.0);
        drag.on_pointer_move(&mut timeline, 900.0);
        assert_eq!(timeline.mission("M1").map(|m| m.start_hour), Some(15));
        assert!(drag.cancel(&mut timeline));
        assert_eq!(timeline.mission("M1").map(|m| m.start_hour), Some(6));
        assert!(!drag.cancel(&mut timeline));
    }

    #[test]
    fn respects_custom_hour_width() {
        let mut timeline = timeline();
        let mut drag = DragController::new(30.0);
        drag.on_pointer_down(&timeline, "M1", 180.0);
        assert_eq!(drag.on_pointer_move(&mut timeline, 270.0), Some(9));
    }
}
