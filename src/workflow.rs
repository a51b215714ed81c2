//! Status machine shared by land and product requests.
//!
//! `pending` can move to `approved` or `rejected` (decided by whoever owns the
//! requested land or product) or to `cancelled` (by the requester). Every
//! other state is terminal.

use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::sea_orm_active_enums::RequestStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestAction {
    Approve,
    Reject,
    Cancel,
}

impl RequestAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
            RequestAction::Cancel => "cancel",
        }
    }
}

impl RequestStatus {
    /// Next status after `action`, or `None` when the transition is not allowed.
    pub fn apply(self, action: RequestAction) -> Option<RequestStatus> {
        match (self, action) {
            (RequestStatus::Pending, RequestAction::Approve) => Some(RequestStatus::Approved),
            (RequestStatus::Pending, RequestAction::Reject) => Some(RequestStatus::Rejected),
            (RequestStatus::Pending, RequestAction::Cancel) => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }
}

/// Number of requests in each status, as shown on the dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RequestCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub cancelled: usize,
}

impl RequestCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = RequestStatus>,
    {
        statuses.into_iter().fold(Self::default(), |mut counts, status| {
            match status {
                RequestStatus::Pending => counts.pending += 1,
                RequestStatus::Approved => counts.approved += 1,
                RequestStatus::Rejected => counts.rejected += 1,
                RequestStatus::Cancelled => counts.cancelled += 1,
            }
            counts
        })
    }
}
