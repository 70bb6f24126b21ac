//! Schedule-driven execution: registered per-org schedules dispatch
//! rules runs, lifecycle passes, and budget reallocations when due.

pub mod schedule;
pub mod service;

pub use schedule::{AutomationSchedule, ScheduleKind};
pub use service::{ExecutionService, ScheduleRun};
