//! One interactive scheduling session: timeline, drag, selection and overlay.
//!
//! The session is the single writer of the mission list. Conflicts are
//! recomputed synchronously after every mutation, so readers never observe a
//! stale conflict set.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::conflicts::ConflictDetector;
use crate::drag::{DragController, DragState, RescheduleEvent};
use crate::error::SchedulerResult;
use crate::layout::{self, LaneGeometry, LaneView, ScheduleMetrics};
use crate::overlay::OverlaySession;
use crate::selection::{Inspector, Selection};
use crate::timeline::Timeline;
use crate::types::Conflict;

pub struct SchedulerSession {
    timeline: Timeline,
    detector: ConflictDetector,
    drag: DragController,
    selection: Selection,
    overlay: OverlaySession,
    geometry: LaneGeometry,
    schedule_date: NaiveDate,
    conflicts: Vec<Conflict>,
    event_log: Vec<RescheduleEvent>,
}

impl SchedulerSession {
    pub fn new(timeline: Timeline, config: &SchedulerConfig) -> Self {
        let mut session = Self {
            timeline,
            detector: ConflictDetector::new(config.conflict_strategy),
            drag: DragController::new(config.hour_width_px),
            selection: Selection::default(),
            overlay: OverlaySession::default(),
            geometry: config.geometry(),
            schedule_date: config.schedule_date,
            conflicts: Vec::new(),
            event_log: Vec::new(),
        };
        session.recompute();
        session
    }

    fn recompute(&mut self) {
        let lanes = self.timeline.robots().iter().map(|robot| robot.id.as_str());
        self.conflicts = self.detector.detect_in_lanes(lanes, self.timeline.missions());
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current conflicts, lane order then start order.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn overlay(&self) -> &OverlaySession {
        &self.overlay
    }

    pub fn open_overlay(&mut self) {
        self.overlay.open();
    }

    pub fn close_overlays(&mut self) {
        self.overlay.close_all();
    }

    /// Reschedules completed in this session, oldest first.
    pub fn event_log(&self) -> &[RescheduleEvent] {
        &self.event_log
    }

    /// Direct start-hour update. Unknown ids change nothing.
    pub fn set_mission_start_hour(&mut self, mission_id: &str, new_start_hour: i64) -> Option<u32> {
        let stored = self.timeline.set_mission_start_hour(mission_id, new_start_hour);
        self.recompute();
        stored
    }

    /// Pointer pressed on a mission block.
    ///
    /// An open overlay swallows the press and closes. Otherwise the mission
    /// is selected and a drag begins. Returns whether a drag started.
    pub fn pointer_down(&mut self, mission_id: &str, pointer_x: f64) -> bool {
        if self.overlay.is_any_open() {
            debug!(mission_id, "[SESSION] pointer-down closed overlay");
            self.overlay.close_all();
            return false;
        }
        if !self.drag.on_pointer_down(&self.timeline, mission_id, pointer_x) {
            return false;
        }
        self.selection.select(mission_id);
        true
    }

    /// Pointer moved anywhere in the document.
    pub fn pointer_move(&mut self, pointer_x: f64) -> Option<u32> {
        let hour = self.drag.on_pointer_move(&mut self.timeline, pointer_x)?;
        self.recompute();
        Some(hour)
    }

    /// Pointer released anywhere in the document.
    pub fn pointer_up(&mut self) -> Option<RescheduleEvent> {
        let event = self.drag.on_pointer_up(&self.timeline)?;
        info!(
            mission_id = %event.mission_id,
            conflicts = self.conflicts.len(),
            "[SESSION] {event}"
        );
        self.event_log.push(event.clone());
        Some(event)
    }

    /// Abort the active drag, restoring the mission's original hour.
    pub fn cancel_drag(&mut self) -> bool {
        let cancelled = self.drag.cancel(&mut self.timeline);
        if cancelled {
            self.recompute();
        }
        cancelled
    }

    pub fn inspector(&self) -> Option<Inspector> {
        self.selection.inspect(&self.timeline, &self.conflicts)
    }

    /// JSON export of the selected mission, if any.
    pub fn json_preview(&self, now: DateTime<Utc>) -> SchedulerResult<Option<String>> {
        match self.inspector() {
            Some(inspector) => Ok(Some(inspector.json_preview(self.schedule_date, now)?)),
            None => Ok(None),
        }
    }

    pub fn lanes(&self) -> Vec<LaneView> {
        layout::lay_out(
            &self.timeline,
            &self.conflicts,
            self.selection.selected(),
            self.geometry,
        )
    }

    pub fn metrics(&self) -> ScheduleMetrics {
        layout::metrics(&self.timeline, &self.conflicts)
    }
}
