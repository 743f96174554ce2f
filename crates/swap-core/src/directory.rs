//! Member directory and skill search.
//!
//! Holds the roster snapshot loaded from the store and answers
//! visibility-filtered keyword queries over offered and wanted skills.

use crate::error::{ExchangeError, Result};
use crate::types::{Actor, Id, Member, SwapRequest, SwapStatus, DEFAULT_REPUTATION};
use tracing::{debug, info};

/// Input for registering a new member.
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub availability: Vec<String>,
    /// Defaults to public when unset.
    pub is_public: Option<bool>,
    pub bio: Option<String>,
}

/// Self-service profile edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    pub bio: Option<String>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
    pub availability: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// The roster of member profiles.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    members: Vec<Member>,
}

impl Directory {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// Full roster in insertion order, hidden members included.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Member> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member_id: &Id) -> bool {
        self.members.iter().any(|m| &m.id == member_id)
    }

    pub fn get(&self, member_id: &Id) -> Result<&Member> {
        self.members
            .iter()
            .find(|m| &m.id == member_id)
            .ok_or_else(|| ExchangeError::MemberNotFound(member_id.clone()))
    }

    fn get_mut(&mut self, member_id: &Id) -> Result<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| &m.id == member_id)
            .ok_or_else(|| ExchangeError::MemberNotFound(member_id.clone()))
    }

    /// Search public members by skill keyword.
    ///
    /// Without a keyword (or with an empty one) every public member is
    /// returned. Otherwise a member matches when the keyword, taken as is,
    /// is a case-insensitive substring of any offered or wanted skill.
    /// Results keep roster order.
    pub fn search(&self, keyword: Option<&str>) -> Vec<&Member> {
        let keyword = keyword.filter(|k| !k.is_empty());
        let results: Vec<&Member> = match keyword {
            None => self.members.iter().filter(|m| m.is_public).collect(),
            Some(keyword) => {
                let needle = keyword.to_lowercase();
                self.members
                    .iter()
                    .filter(|m| m.is_public && m.has_skill_matching(&needle))
                    .collect()
            }
        };
        debug!(
            keyword = keyword.unwrap_or(""),
            matches = results.len(),
            "directory search"
        );
        results
    }

    /// Set a member's public flag. Administrators only.
    ///
    /// Returns whether the flag changed; setting the current value is a
    /// successful no-op.
    pub fn set_visibility(&mut self, actor: &Actor, member_id: &Id, public: bool) -> Result<bool> {
        if !actor.is_admin {
            return Err(ExchangeError::unauthorized(
                &actor.member_id,
                "change member visibility",
            ));
        }
        let member = self.get_mut(member_id)?;
        if member.is_public == public {
            return Ok(false);
        }
        member.is_public = public;
        info!(member_id = %member_id, public, by = %actor.member_id, "member visibility changed");
        Ok(true)
    }

    /// Register a new member with a fresh id.
    pub fn register(&mut self, new_member: NewMember) -> Result<&Member> {
        let email = new_member.email.trim().to_string();
        let name = new_member.name.trim().to_string();
        if email.is_empty() {
            return Err(ExchangeError::validation("email is required"));
        }
        if name.is_empty() {
            return Err(ExchangeError::validation("name is required"));
        }
        if self.members.iter().any(|m| m.email.trim() == email) {
            return Err(ExchangeError::validation(format!(
                "email already registered: {email}"
            )));
        }

        let member = Member {
            id: Id::new(),
            name,
            email,
            location: non_blank(new_member.location),
            profile_photo: non_blank(new_member.profile_photo),
            skills_offered: normalize_tags(new_member.skills_offered),
            skills_wanted: normalize_tags(new_member.skills_wanted),
            availability: normalize_tags(new_member.availability),
            is_public: new_member.is_public.unwrap_or(true),
            is_admin: false,
            rating: DEFAULT_REPUTATION,
            bio: non_blank(new_member.bio),
        };
        info!(member_id = %member.id, "member registered");
        self.members.push(member);
        Ok(&self.members[self.members.len() - 1])
    }

    /// Apply a profile edit. Only the profile's owner may edit it.
    pub fn update_profile(
        &mut self,
        actor: &Actor,
        member_id: &Id,
        update: ProfileUpdate,
    ) -> Result<&Member> {
        // Resolve first so unknown ids report NotFound for every caller.
        self.get(member_id)?;
        if &actor.member_id != member_id {
            return Err(ExchangeError::unauthorized(
                &actor.member_id,
                "edit another member's profile",
            ));
        }
        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(ExchangeError::validation("name is required"));
            }
        }

        let member = self.get_mut(member_id)?;
        if let Some(name) = update.name {
            member.name = name.trim().to_string();
        }
        if let Some(location) = update.location {
            member.location = non_blank(Some(location));
        }
        if let Some(photo) = update.profile_photo {
            member.profile_photo = non_blank(Some(photo));
        }
        if let Some(bio) = update.bio {
            member.bio = non_blank(Some(bio));
        }
        if let Some(skills) = update.skills_offered {
            member.skills_offered = normalize_tags(skills);
        }
        if let Some(skills) = update.skills_wanted {
            member.skills_wanted = normalize_tags(skills);
        }
        if let Some(availability) = update.availability {
            member.availability = normalize_tags(availability);
        }
        if let Some(public) = update.is_public {
            member.is_public = public;
        }
        info!(member_id = %member_id, "profile updated");
        Ok(&*member)
    }

    /// Recompute a member's reputation from the completed swaps they took
    /// part in. Members without rated swaps keep their current score.
    pub fn recompute_reputation(&mut self, member_id: &Id, requests: &[SwapRequest]) -> Result<f64> {
        let ratings: Vec<u8> = requests
            .iter()
            .filter(|r| r.status == SwapStatus::Completed && r.involves(member_id))
            .filter_map(|r| r.rating)
            .collect();

        let member = self.get_mut(member_id)?;
        if !ratings.is_empty() {
            let total: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
            let mean = f64::from(total) / ratings.len() as f64;
            member.rating = (mean * 10.0).round() / 10.0;
            debug!(member_id = %member_id, rating = member.rating, swaps = ratings.len(), "reputation recomputed");
        }
        Ok(member.rating)
    }
}

/// Trim entries, drop blanks and keep the first occurrence of duplicates.
fn normalize_tags(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Utc;

    fn member(id: &str, offered: &[&str], wanted: &[&str], public: bool) -> Member {
        Member {
            id: Id::from(id),
            name: format!("member-{id}"),
            email: format!("{id}@example.com"),
            location: None,
            profile_photo: None,
            skills_offered: offered.iter().map(|s| (*s).to_string()).collect(),
            skills_wanted: wanted.iter().map(|s| (*s).to_string()).collect(),
            availability: Vec::new(),
            is_public: public,
            is_admin: false,
            rating: DEFAULT_REPUTATION,
            bio: None,
        }
    }

    fn roster() -> Directory {
        Directory::new(vec![
            member("1", &["Graphic Design", "Photoshop"], &["React"], true),
            member("2", &["React", "Node.js"], &["UI/UX Design"], true),
            member("3", &["Python"], &["SQL"], false),
            member("4", &["SEO"], &["Video Editing"], true),
        ])
    }

    fn ids(members: &[&Member]) -> Vec<String> {
        members.iter().map(|m| m.id.to_string()).collect()
    }

    fn completed(requester: &str, receiver: &str, rating: u8) -> SwapRequest {
        SwapRequest {
            id: Id::new(),
            requester_id: Id::from(requester),
            receiver_id: Id::from(receiver),
            skill_offered: "A".into(),
            skill_wanted: "B".into(),
            message: String::new(),
            status: SwapStatus::Completed,
            created_at: Utc::now(),
            rating: Some(rating),
            feedback: Some(String::new()),
        }
    }

    #[test]
    fn search_without_keyword_returns_public_members_in_order() {
        let dir = roster();
        assert_eq!(ids(&dir.search(None)), vec!["1", "2", "4"]);
        assert_eq!(ids(&dir.search(Some(""))), vec!["1", "2", "4"]);
        assert!(dir.search(Some("   ")).is_empty());
    }

    #[test]
    fn search_keyword_whitespace_is_significant() {
        let dir = Directory::new(vec![
            member("1", &["React"], &[], true),
            member("2", &["Graphic Design"], &[], true),
        ]);
        assert_eq!(ids(&dir.search(Some(" "))), vec!["2"]);
        assert!(dir.search(Some(" react")).is_empty());
        assert_eq!(ids(&dir.search(Some("c D"))), vec!["2"]);
    }

    #[test]
    fn search_matches_offered_or_wanted_case_insensitively() {
        let dir = roster();
        assert_eq!(ids(&dir.search(Some("react"))), vec!["1", "2"]);
        assert_eq!(ids(&dir.search(Some("DESIGN"))), vec!["1", "2"]);
        assert_eq!(ids(&dir.search(Some("edit"))), vec!["4"]);
    }

    #[test]
    fn owner_can_republish_hidden_profile() {
        let mut dir = roster();
        dir.set_visibility(&Actor::admin("admin"), &Id::from("3"), false)
            .unwrap();
        dir.update_profile(
            &Actor::member("3"),
            &Id::from("3"),
            ProfileUpdate {
                is_public: Some(true),
                ..ProfileUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(ids(&dir.search(Some("python"))), vec!["3"]);
    }

    #[test]
    fn search_never_returns_hidden_members() {
        let dir = roster();
        assert!(dir.search(Some("python")).is_empty());
        assert!(dir.search(Some("sql")).is_empty());
    }

    #[test]
    fn set_visibility_requires_admin() {
        let mut dir = roster();
        let err = dir
            .set_visibility(&Actor::member("1"), &Id::from("2"), false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(dir.get(&Id::from("2")).unwrap().is_public);
    }

    #[test]
    fn set_visibility_unknown_member() {
        let mut dir = roster();
        let err = dir
            .set_visibility(&Actor::admin("admin"), &Id::from("99"), false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn set_visibility_is_idempotent() {
        let mut dir = roster();
        let admin = Actor::admin("admin");
        assert!(dir.set_visibility(&admin, &Id::from("3"), true).unwrap());
        assert!(!dir.set_visibility(&admin, &Id::from("3"), true).unwrap());
        assert!(dir.get(&Id::from("3")).unwrap().is_public);
    }

    #[test]
    fn hidden_member_drops_out_of_search() {
        let mut dir = roster();
        dir.set_visibility(&Actor::admin("admin"), &Id::from("2"), false)
            .unwrap();
        assert_eq!(ids(&dir.search(None)), vec!["1", "4"]);
    }

    #[test]
    fn register_assigns_defaults() {
        let mut dir = Directory::default();
        let member = dir
            .register(NewMember {
                name: " Erin ".into(),
                email: "erin@example.com".into(),
                skills_offered: vec!["Rust".into(), " ".into(), "Rust".into()],
                ..Default::default()
            })
            .unwrap()
            .clone();
        assert_eq!(member.name, "Erin");
        assert!(member.is_public);
        assert!(!member.is_admin);
        assert_eq!(member.skills_offered, vec!["Rust"]);
        assert!((member.rating - DEFAULT_REPUTATION).abs() < f64::EPSILON);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn register_rejects_duplicate_email() {
        let mut dir = roster();
        let err = dir
            .register(NewMember {
                name: "Copy".into(),
                email: "1@example.com".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(dir.len(), 4);
    }

    #[test]
    fn register_requires_email_and_name() {
        let mut dir = Directory::default();
        assert!(dir
            .register(NewMember {
                name: "No Email".into(),
                ..Default::default()
            })
            .is_err());
        assert!(dir
            .register(NewMember {
                email: "x@example.com".into(),
                ..Default::default()
            })
            .is_err());
        assert!(dir.is_empty());
    }

    #[test]
    fn owner_can_edit_profile() {
        let mut dir = roster();
        let updated = dir
            .update_profile(
                &Actor::member("1"),
                &Id::from("1"),
                ProfileUpdate {
                    location: Some("Austin, TX".into()),
                    skills_wanted: Some(vec!["Rust".into(), "Go".into()]),
                    is_public: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.location.as_deref(), Some("Austin, TX"));
        assert_eq!(updated.skills_wanted, vec!["Rust", "Go"]);
        assert!(!updated.is_public);
        assert_eq!(updated.skills_offered, vec!["Graphic Design", "Photoshop"]);
    }

    #[test]
    fn admin_cannot_edit_another_profile() {
        let mut dir = roster();
        let err = dir
            .update_profile(
                &Actor::admin("admin"),
                &Id::from("1"),
                ProfileUpdate {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(dir.get(&Id::from("1")).unwrap().name, "member-1");
    }

    #[test]
    fn profile_edit_rejects_blank_name() {
        let mut dir = roster();
        let err = dir
            .update_profile(
                &Actor::member("1"),
                &Id::from("1"),
                ProfileUpdate {
                    name: Some("  ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn reputation_is_mean_of_completed_ratings() {
        let mut dir = roster();
        let requests = vec![
            completed("1", "2", 4),
            completed("2", "1", 5),
            completed("4", "1", 4),
            completed("2", "4", 1),
        ];
        let rating = dir.recompute_reputation(&Id::from("1"), &requests).unwrap();
        assert!((rating - 4.3).abs() < 1e-9);
        assert!((dir.get(&Id::from("1")).unwrap().rating - 4.3).abs() < 1e-9);
    }

    #[test]
    fn reputation_unchanged_without_rated_swaps() {
        let mut dir = roster();
        let rating = dir.recompute_reputation(&Id::from("3"), &[]).unwrap();
        assert!((rating - DEFAULT_REPUTATION).abs() < f64::EPSILON);
    }
}
