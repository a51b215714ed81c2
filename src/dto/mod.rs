pub mod auth;
pub mod customer;
pub mod farmer;
pub mod landowner;

use crate::{forms::FormData, workflow::RequestAction};

/// Approve/reject buttons post the request id together with the pressed button.
pub(crate) fn request_decision(data: &FormData) -> Option<(String, RequestAction)> {
    let request_id = data.get("request_id")?.to_string();
    if data.has("approve_request") {
        Some((request_id, RequestAction::Approve))
    } else if data.has("reject_request") {
        Some((request_id, RequestAction::Reject))
    } else {
        None
    }
}
