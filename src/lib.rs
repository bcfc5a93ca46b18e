//! Mission scheduling core for the FarmFlow greenhouse console.
//!
//! Robots own fixed timeline lanes; missions are hour-aligned blocks on those
//! lanes. The crate detects same-lane overlaps, turns pointer drags into
//! start-hour changes, and projects the result for a rendering layer.

pub mod config;
pub mod conflicts;
pub mod drag;
pub mod error;
pub mod fleet;
pub mod layout;
pub mod logging;
pub mod overlay;
pub mod selection;
pub mod session;
pub mod sim;
pub mod timeline;
pub mod types;

pub use config::SchedulerConfig;
pub use conflicts::{ConflictDetector, ConflictStrategy, detect_conflicts};
pub use drag::{DragController, DragState, RescheduleEvent};
pub use error::{SchedulerError, SchedulerResult};
pub use fleet::Fleet;
pub use session::SchedulerSession;
pub use timeline::Timeline;
pub use types::{Conflict, Mission, MissionCategory, ParamValue, Robot, RobotCategory};
