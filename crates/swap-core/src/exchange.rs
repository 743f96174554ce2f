//! The exchange: one directory, one ledger and the store behind them.
//!
//! Every mutation runs against a copy of the affected collection, is
//! persisted as a whole-collection replace, and only then becomes the live
//! snapshot. A failed call leaves both memory and storage as they were.
//! Mutations take `&mut self`, so within a process there is exactly one
//! writer at a time.

use crate::config::Config;
use crate::directory::{Directory, NewMember, ProfileUpdate};
use crate::error::{ExchangeError, Result};
use crate::ledger::{Ledger, LedgerPolicy, MemberRequests, NewSwapRequest};
use crate::report::{render_report, ReportKind};
use crate::seed::demo_members;
use crate::store::Store;
use crate::types::{Actor, Id, Member, SwapRequest};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Exchange<S: Store> {
    store: S,
    directory: Directory,
    ledger: Ledger,
}

impl<S: Store> Exchange<S> {
    /// Load both collections using the configured ledger policy, seeding
    /// an empty roster when `seed_directory` is set.
    pub fn open(store: S, config: &Config) -> Result<Self> {
        Self::open_with(store, config.ledger_policy(), config.seed_directory)
    }

    pub fn open_with(mut store: S, policy: LedgerPolicy, seed_directory: bool) -> Result<Self> {
        let mut members = store.load_members()?;
        if members.is_empty() && seed_directory {
            members = demo_members();
            store.save_members(&members)?;
            info!(count = members.len(), "seeded empty directory with demo members");
        }
        let requests = store.load_requests()?;
        debug!(
            members = members.len(),
            requests = requests.len(),
            "exchange opened"
        );

        Ok(Self {
            store,
            directory: Directory::new(members),
            ledger: Ledger::with_policy(requests, policy),
        })
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // --- Directory ---

    pub fn search(&self, keyword: Option<&str>) -> Vec<&Member> {
        self.directory.search(keyword)
    }

    /// Keyword search narrowed for browsing: the viewer is left out, and a
    /// non-empty `availability` tag must exactly match one of the member's.
    pub fn discover(
        &self,
        keyword: Option<&str>,
        availability: Option<&str>,
        viewer: Option<&Id>,
    ) -> Vec<&Member> {
        let mut members = self.directory.search(keyword);
        if let Some(viewer) = viewer {
            members.retain(|m| &m.id != viewer);
        }
        if let Some(tag) = availability.filter(|t| !t.is_empty()) {
            members.retain(|m| m.availability.iter().any(|a| a == tag));
        }
        members
    }

    pub fn member(&self, member_id: &Id) -> Result<&Member> {
        self.directory.get(member_id)
    }

    pub fn register(&mut self, new_member: NewMember) -> Result<Member> {
        self.mutate_directory(|directory| directory.register(new_member).cloned())
    }

    pub fn update_profile(
        &mut self,
        actor: &Actor,
        member_id: &Id,
        update: ProfileUpdate,
    ) -> Result<Member> {
        self.mutate_directory(|directory| {
            directory
                .update_profile(actor, member_id, update)
                .cloned()
        })
    }

    /// Administrator visibility toggle. Returns whether the flag changed;
    /// a no-op leaves storage untouched.
    pub fn set_visibility(
        &mut self,
        actor: &Actor,
        member_id: &Id,
        public: bool,
    ) -> Result<bool> {
        let mut next = self.directory.clone();
        let changed = next.set_visibility(actor, member_id, public)?;
        if changed {
            self.store.save_members(next.members())?;
            self.directory = next;
        }
        Ok(changed)
    }

    // --- Ledger ---

    /// Create a pending request from `actor` to `receiver_id`. Both members
    /// must exist in the directory.
    pub fn create_request(
        &mut self,
        actor: &Actor,
        receiver_id: &Id,
        skill_offered: &str,
        skill_wanted: &str,
        message: &str,
    ) -> Result<SwapRequest> {
        self.directory.get(&actor.member_id)?;
        self.directory.get(receiver_id)?;

        let new_request = NewSwapRequest {
            requester_id: actor.member_id.clone(),
            receiver_id: receiver_id.clone(),
            skill_offered: skill_offered.to_string(),
            skill_wanted: skill_wanted.to_string(),
            message: message.to_string(),
        };
        self.mutate_ledger(|ledger| ledger.create(new_request).cloned())
    }

    pub fn accept(&mut self, actor: &Actor, request_id: &Id) -> Result<SwapRequest> {
        self.mutate_ledger(|ledger| ledger.accept(request_id, &actor.member_id).cloned())
    }

    pub fn reject(&mut self, actor: &Actor, request_id: &Id) -> Result<SwapRequest> {
        self.mutate_ledger(|ledger| ledger.reject(request_id, &actor.member_id).cloned())
    }

    pub fn cancel(&mut self, actor: &Actor, request_id: &Id) -> Result<SwapRequest> {
        self.mutate_ledger(|ledger| ledger.cancel(request_id, &actor.member_id))
    }

    /// Complete an accepted swap, then recompute both participants'
    /// reputation from the updated ledger.
    pub fn complete(
        &mut self,
        actor: &Actor,
        request_id: &Id,
        rating: Option<u8>,
        feedback: Option<String>,
    ) -> Result<SwapRequest> {
        let mut next_ledger = self.ledger.clone();
        let completed = next_ledger
            .complete(request_id, &actor.member_id, rating, feedback)?
            .clone();

        let mut next_directory = self.directory.clone();
        for participant in [&completed.requester_id, &completed.receiver_id] {
            match next_directory.recompute_reputation(participant, next_ledger.requests()) {
                Ok(_) => {}
                // Requests may outlive a roster edit made outside the exchange.
                Err(ExchangeError::MemberNotFound(id)) => {
                    warn!(member_id = %id, "completed swap references unknown member");
                }
                Err(e) => return Err(e),
            }
        }

        self.store.save_requests(next_ledger.requests())?;
        if let Err(e) = self.store.save_members(next_directory.members()) {
            if let Err(restore) = self.store.save_requests(self.ledger.requests()) {
                warn!(error = %restore, "failed to restore requests after member save failure");
            }
            return Err(e.into());
        }

        self.ledger = next_ledger;
        self.directory = next_directory;
        Ok(completed)
    }

    pub fn requests_for(&self, member_id: &Id) -> MemberRequests<'_> {
        self.ledger.list_for_member(member_id)
    }

    pub fn request(&self, request_id: &Id) -> Result<&SwapRequest> {
        self.ledger.get(request_id)
    }

    // --- Reporting ---

    /// Render a bulk export. Administrators only.
    pub fn export(&self, actor: &Actor, kind: ReportKind) -> Result<String> {
        if !actor.is_admin {
            return Err(ExchangeError::unauthorized(&actor.member_id, "export reports"));
        }
        render_report(kind, self.directory.members(), self.ledger.requests()).map_err(|e| {
            ExchangeError::Storage(crate::store::StorageError::Serialization {
                path: kind.file_name().into(),
                source: e,
            })
        })
    }

    fn mutate_directory<T>(&mut self, f: impl FnOnce(&mut Directory) -> Result<T>) -> Result<T> {
        let mut next = self.directory.clone();
        let out = f(&mut next)?;
        self.store.save_members(next.members())?;
        self.directory = next;
        Ok(out)
    }

    fn mutate_ledger<T>(&mut self, f: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let mut next = self.ledger.clone();
        let out = f(&mut next)?;
        self.store.save_requests(next.requests())?;
        self.ledger = next;
        Ok(out)
    }
}
