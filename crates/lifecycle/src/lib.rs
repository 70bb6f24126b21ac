//! Campaign lifecycle automation: scheduled activation, budget
//! exhaustion handling, end-date completion with post-campaign
//! analysis, and performance-driven pause/resume.

pub mod manager;
pub mod transitions;

pub use manager::{LifecycleManager, LifecycleSummary};
pub use transitions::can_transition;
