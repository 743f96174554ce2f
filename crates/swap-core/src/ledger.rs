//! Swap request ledger.
//!
//! Owns the swap request collection and enforces the lifecycle:
//!
//! ```text
//! create -> pending -> accepted -> completed
//!                   \-> rejected
//!                   \-> (cancel: record removed)
//! ```
//!
//! Checks run in a fixed order (existence, caller, status, input) and no
//! record is touched until every check has passed.

use crate::error::{ExchangeError, Result};
use crate::types::{Id, SwapRequest, SwapStatus};
use chrono::Utc;
use tracing::{debug, info};

/// Lowest accepted post-completion rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted post-completion rating.
pub const MAX_RATING: u8 = 5;

/// Tunable creation and completion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Reject a new request that duplicates a pending one (same requester,
    /// receiver and skill pair).
    pub dedupe_pending_requests: bool,
    /// Rating recorded when `complete` is called without one.
    pub default_rating: u8,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            dedupe_pending_requests: false,
            default_rating: MAX_RATING,
        }
    }
}

/// Input for a new swap request.
#[derive(Debug, Clone)]
pub struct NewSwapRequest {
    pub requester_id: Id,
    pub receiver_id: Id,
    pub skill_offered: String,
    pub skill_wanted: String,
    pub message: String,
}

/// A member's requests split by direction, oldest first.
#[derive(Debug, Default)]
pub struct MemberRequests<'a> {
    pub received: Vec<&'a SwapRequest>,
    pub sent: Vec<&'a SwapRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    requests: Vec<SwapRequest>,
    policy: LedgerPolicy,
}

impl Ledger {
    pub fn new(requests: Vec<SwapRequest>) -> Self {
        Self::with_policy(requests, LedgerPolicy::default())
    }

    pub fn with_policy(requests: Vec<SwapRequest>, policy: LedgerPolicy) -> Self {
        Self { requests, policy }
    }

    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// All requests in insertion order.
    pub fn requests(&self) -> &[SwapRequest] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<SwapRequest> {
        self.requests
    }

    pub fn get(&self, request_id: &Id) -> Result<&SwapRequest> {
        self.requests
            .iter()
            .find(|r| &r.id == request_id)
            .ok_or_else(|| ExchangeError::RequestNotFound(request_id.clone()))
    }

    pub fn count_by_status(&self, status: SwapStatus) -> usize {
        self.requests.iter().filter(|r| r.status == status).count()
    }

    /// Create a pending request.
    ///
    /// Skills are not checked against either member's profile; that belongs
    /// to the caller.
    pub fn create(&mut self, new_request: NewSwapRequest) -> Result<&SwapRequest> {
        let skill_offered = new_request.skill_offered.trim();
        let skill_wanted = new_request.skill_wanted.trim();

        if new_request.requester_id == new_request.receiver_id {
            return Err(ExchangeError::validation(
                "cannot request a swap with yourself",
            ));
        }
        if skill_offered.is_empty() {
            return Err(ExchangeError::validation("skill offered is required"));
        }
        if skill_wanted.is_empty() {
            return Err(ExchangeError::validation("skill wanted is required"));
        }
        if self.policy.dedupe_pending_requests
            && self.requests.iter().any(|r| {
                r.status == SwapStatus::Pending
                    && r.requester_id == new_request.requester_id
                    && r.receiver_id == new_request.receiver_id
                    && r.skill_offered == skill_offered
                    && r.skill_wanted == skill_wanted
            })
        {
            return Err(ExchangeError::validation(
                "an identical swap request is already pending",
            ));
        }

        let request = SwapRequest {
            id: Id::new(),
            requester_id: new_request.requester_id,
            receiver_id: new_request.receiver_id,
            skill_offered: skill_offered.to_string(),
            skill_wanted: skill_wanted.to_string(),
            message: new_request.message,
            status: SwapStatus::Pending,
            created_at: Utc::now(),
            rating: None,
            feedback: None,
        };
        info!(
            request_id = %request.id,
            requester = %request.requester_id,
            receiver = %request.receiver_id,
            "swap request created"
        );
        self.requests.push(request);
        Ok(&self.requests[self.requests.len() - 1])
    }

    /// Receiver accepts a pending request.
    pub fn accept(&mut self, request_id: &Id, caller: &Id) -> Result<&SwapRequest> {
        self.respond(request_id, caller, SwapStatus::Accepted, "accept")
    }

    /// Receiver rejects a pending request.
    pub fn reject(&mut self, request_id: &Id, caller: &Id) -> Result<&SwapRequest> {
        self.respond(request_id, caller, SwapStatus::Rejected, "reject")
    }

    fn respond(
        &mut self,
        request_id: &Id,
        caller: &Id,
        to: SwapStatus,
        action: &'static str,
    ) -> Result<&SwapRequest> {
        let index = self.position(request_id)?;
        let request = &mut self.requests[index];
        if &request.receiver_id != caller {
            return Err(ExchangeError::unauthorized(caller, action));
        }
        expect_status(request, SwapStatus::Pending, action)?;

        request.status = to;
        info!(request_id = %request_id, status = %to, "swap request {action}ed");
        Ok(&*request)
    }

    /// Requester withdraws a pending request. The record is removed and
    /// returned.
    pub fn cancel(&mut self, request_id: &Id, caller: &Id) -> Result<SwapRequest> {
        let index = self.position(request_id)?;
        let request = &self.requests[index];
        if &request.requester_id != caller {
            return Err(ExchangeError::unauthorized(caller, "cancel"));
        }
        expect_status(request, SwapStatus::Pending, "cancel")?;

        let removed = self.requests.remove(index);
        info!(request_id = %request_id, "swap request canceled");
        Ok(removed)
    }

    /// Either participant marks an accepted swap as done, attaching a
    /// rating (default from policy) and optional feedback.
    pub fn complete(
        &mut self,
        request_id: &Id,
        caller: &Id,
        rating: Option<u8>,
        feedback: Option<String>,
    ) -> Result<&SwapRequest> {
        let index = self.position(request_id)?;
        let default_rating = self.policy.default_rating;
        let request = &mut self.requests[index];
        if !request.involves(caller) {
            return Err(ExchangeError::unauthorized(caller, "complete"));
        }
        expect_status(request, SwapStatus::Accepted, "complete")?;
        if let Some(rating) = rating {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(ExchangeError::validation(format!(
                    "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
                )));
            }
        }

        let rating = rating.unwrap_or(default_rating);
        request.status = SwapStatus::Completed;
        request.rating = Some(rating);
        request.feedback = Some(feedback.unwrap_or_default());
        info!(request_id = %request_id, rating, "swap completed");
        Ok(&*request)
    }

    /// Requests where the member is receiver or requester, oldest first.
    pub fn list_for_member(&self, member_id: &Id) -> MemberRequests<'_> {
        let mut listing = MemberRequests::default();
        for request in &self.requests {
            if &request.receiver_id == member_id {
                listing.received.push(request);
            } else if &request.requester_id == member_id {
                listing.sent.push(request);
            }
        }
        debug!(
            member_id = %member_id,
            received = listing.received.len(),
            sent = listing.sent.len(),
            "listed swap requests"
        );
        listing
    }

    fn position(&self, request_id: &Id) -> Result<usize> {
        self.requests
            .iter()
            .position(|r| &r.id == request_id)
            .ok_or_else(|| ExchangeError::RequestNotFound(request_id.clone()))
    }
}

fn expect_status(request: &SwapRequest, expected: SwapStatus, action: &'static str) -> Result<()> {
    if request.status == expected {
        Ok(())
    } else {
        Err(ExchangeError::InvalidTransition {
            from: request.status,
            action,
        })
    }
}
