//! Status transition table. Every automated transition goes through
//! [`can_transition`] before any write.

use autopilot_core::types::CampaignStatus;

/// Whether a campaign may move from `from` to `to`.
///
/// Completed is terminal. Paused campaigns can only resume or complete;
/// they never go back to Draft or Scheduled.
pub fn can_transition(from: CampaignStatus, to: CampaignStatus) -> bool {
    use CampaignStatus::*;
    matches!(
        (from, to),
        (Draft, Scheduled)
            | (Draft, Active)
            | (Scheduled, Active)
            | (Scheduled, Draft)
            | (Active, Paused)
            | (Active, Completed)
            | (Paused, Active)
            | (Paused, Completed)
    )
}
