//! End-to-end swap lifecycle over the JSON-file store.
//!
//! Each test opens an exchange in a fresh temp directory seeded with the
//! demo roster (members `1` to `4`).

use swap_core::{
    Actor, Config, ErrorKind, Exchange, Id, JsonFileStore, ReportKind, Store, SwapRequest,
    SwapStatus,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Exchange<JsonFileStore> {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    Exchange::open(config.json_store(), &config).unwrap()
}

fn member(id: &str) -> Actor {
    Actor::member(id)
}

fn ids(requests: &[&SwapRequest]) -> Vec<Id> {
    requests.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn scenario_a_request_accept_complete() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);

    let request = exchange
        .create_request(&member("1"), &Id::from("2"), "Photoshop", "React", "hi")
        .unwrap();
    assert_eq!(request.status, SwapStatus::Pending);

    let accepted = exchange.accept(&member("2"), &request.id).unwrap();
    assert_eq!(accepted.status, SwapStatus::Accepted);

    let completed = exchange
        .complete(&member("1"), &request.id, Some(4), Some("great".into()))
        .unwrap();
    assert_eq!(completed.status, SwapStatus::Completed);
    assert_eq!(completed.rating, Some(4));
    assert_eq!(completed.feedback.as_deref(), Some("great"));

    // Reopening reads back what was persisted.
    drop(exchange);
    let reopened = open(&dir);
    let stored = reopened.request(&request.id).unwrap();
    assert_eq!(stored, &completed);
    let alice = reopened.member(&Id::from("1")).unwrap();
    assert!((alice.rating - 4.0).abs() < f64::EPSILON);
}

#[test]
fn scenario_b_requester_cannot_accept() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);

    let request = exchange
        .create_request(&member("1"), &Id::from("2"), "Photoshop", "React", "")
        .unwrap();
    let err = exchange.accept(&member("1"), &request.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    assert_eq!(
        exchange.request(&request.id).unwrap().status,
        SwapStatus::Pending
    );
    let stored = exchange.store().load_requests().unwrap();
    assert_eq!(stored[0].status, SwapStatus::Pending);
}

#[test]
fn scenario_c_cancel_removes_from_both_listings() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);

    let keep = exchange
        .create_request(&member("2"), &Id::from("1"), "React", "Photoshop", "")
        .unwrap();
    let request = exchange
        .create_request(&member("1"), &Id::from("2"), "Photoshop", "React", "")
        .unwrap();
    exchange.cancel(&member("1"), &request.id).unwrap();

    let u1 = exchange.requests_for(&Id::from("1"));
    assert!(u1.sent.is_empty());
    assert_eq!(ids(&u1.received), vec![keep.id.clone()]);

    let u2 = exchange.requests_for(&Id::from("2"));
    assert!(u2.received.is_empty());
    assert_eq!(ids(&u2.sent), vec![keep.id]);

    assert_eq!(exchange.store().load_requests().unwrap().len(), 1);
}

#[test]
fn scenario_d_hidden_member_leaves_search() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);
    let admin = Actor::admin("admin");

    assert!(exchange
        .set_visibility(&admin, &Id::from("3"), false)
        .unwrap());
    let visible: Vec<Id> = exchange.search(None).iter().map(|m| m.id.clone()).collect();
    assert_eq!(visible, vec![Id::from("1"), Id::from("2"), Id::from("4")]);
    assert!(exchange.search(Some("python")).is_empty());

    // Idempotent: hiding again changes nothing.
    assert!(!exchange
        .set_visibility(&admin, &Id::from("3"), false)
        .unwrap());

    drop(exchange);
    let reopened = open(&dir);
    assert!(!reopened.member(&Id::from("3")).unwrap().is_public);
}

#[test]
fn discovery_narrows_keyword_search() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);
    exchange
        .set_visibility(&Actor::admin("admin"), &Id::from("3"), false)
        .unwrap();

    let found: Vec<Id> = exchange
        .discover(None, Some("Weekends"), Some(&Id::from("4")))
        .iter()
        .map(|m| m.id.clone())
        .collect();
    assert_eq!(found, vec![Id::from("1")]);
}

#[test]
fn non_admin_cannot_hide_members() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);

    let err = exchange
        .set_visibility(&member("1"), &Id::from("2"), false)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(exchange.search(None).len(), 4);
}

#[test]
fn search_matches_demo_roster() {
    let dir = TempDir::new().unwrap();
    let exchange = open(&dir);

    let names = |keyword: &str| -> Vec<String> {
        exchange
            .search(Some(keyword))
            .iter()
            .map(|m| m.name.clone())
            .collect()
    };
    assert_eq!(names("photoshop"), vec!["Alice Johnson", "Bob Smith"]);
    assert_eq!(
        names("graphic design"),
        vec!["Alice Johnson", "David Wilson"]
    );
    assert!(names("cooking").is_empty());
}

#[test]
fn rejected_and_completed_requests_stay_terminal() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);

    let rejected = exchange
        .create_request(&member("3"), &Id::from("4"), "Python", "SEO", "")
        .unwrap();
    exchange.reject(&member("4"), &rejected.id).unwrap();
    let err = exchange.accept(&member("4"), &rejected.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    let done = exchange
        .create_request(&member("3"), &Id::from("4"), "Excel", "SEO", "")
        .unwrap();
    let err = exchange
        .complete(&member("3"), &done.id, None, None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    exchange.accept(&member("4"), &done.id).unwrap();
    exchange.complete(&member("4"), &done.id, None, None).unwrap();
    let err = exchange.cancel(&member("3"), &done.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    assert_eq!(
        exchange.request(&rejected.id).unwrap().status,
        SwapStatus::Rejected
    );
    let done = exchange.request(&done.id).unwrap();
    assert_eq!(done.status, SwapStatus::Completed);
    assert_eq!(done.rating, Some(5));
}

#[test]
fn self_swap_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);

    let err = exchange
        .create_request(&member("1"), &Id::from("1"), "Photoshop", "React", "")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(exchange.store().load_requests().unwrap().is_empty());
}

#[test]
fn saving_loaded_requests_round_trips() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);
    let first = exchange
        .create_request(&member("1"), &Id::from("2"), "Photoshop", "React", "hi")
        .unwrap();
    exchange
        .create_request(&member("4"), &Id::from("1"), "SEO", "Graphic Design", "")
        .unwrap();
    exchange.accept(&member("2"), &first.id).unwrap();
    exchange
        .complete(&member("2"), &first.id, Some(2), Some("late".into()))
        .unwrap();

    let mut store = exchange.into_store();
    let loaded = store.load_requests().unwrap();
    store.save_requests(&loaded).unwrap();
    assert_eq!(store.load_requests().unwrap(), loaded);
}

#[test]
fn admin_exports_activity() {
    let dir = TempDir::new().unwrap();
    let mut exchange = open(&dir);
    exchange
        .create_request(&member("1"), &Id::from("2"), "Photoshop", "React", "")
        .unwrap();

    let json = exchange
        .export(&Actor::admin("admin"), ReportKind::Activity)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["totalUsers"], 4);
    assert_eq!(value["totalSwaps"], 1);
    assert_eq!(value["pendingSwaps"], 1);
    assert_eq!(value["completedSwaps"], 0);
    assert_eq!(value["publicUsers"], 4);
}
