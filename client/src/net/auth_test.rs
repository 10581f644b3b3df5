use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::net::testing::ScriptedTransport;
use crate::session::testing::{EPOCH, ManualClock, session_for, user};
use crate::util::storage::MemoryStore;

struct Fixture {
    client: AuthClient,
    transport: ScriptedTransport,
    store: MemoryStore,
    clock: ManualClock,
    events: Rc<RefCell<Vec<AuthEvent>>>,
    _subscription: AuthSubscription,
}

fn config() -> BackendConfig {
    BackendConfig::new("https://abc.supabase.co", "anon-key")
}

fn fixture() -> Fixture {
    let transport = ScriptedTransport::default();
    let store = MemoryStore::new();
    let clock = ManualClock::new(EPOCH);
    let client = AuthClient::new(config(), Rc::new(transport.clone()), Rc::new(store.clone()), Rc::new(clock.clone()));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let subscription = client.on_auth_state_change(move |change| sink.borrow_mut().push(change.event));
    Fixture { client, transport, store, clock, events, _subscription: subscription }
}

fn now() -> i64 {
    EPOCH.unix_timestamp()
}

fn session_json(email: &str, access: &str, expires_at: i64) -> String {
    let mut session = session_for(user(email));
    session.access_token = access.to_owned();
    session.expires_at = Some(expires_at);
    serde_json::to_string(&session).unwrap_or_default()
}

fn user_json(email: &str) -> String {
    serde_json::to_string(&user(email)).unwrap_or_default()
}

fn seed_session(f: &Fixture, access: &str, expires_at: i64) {
    f.store.set(&config().session_storage_key(), &session_json("alice@example.com", access, expires_at));
}

// =============================================================================
// request builders
// =============================================================================

#[test]
fn sign_in_request_uses_password_grant() {
    let req = sign_in_request(&config(), " alice@example.com ", "pw");
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "https://abc.supabase.co/auth/v1/token");
    assert_eq!(req.query_value("grant_type"), Some("password"));
    assert_eq!(req.body, Some(json!({ "email": "alice@example.com", "password": "pw" })));
}

#[test]
fn sign_up_request_carries_redirect() {
    let req = sign_up_request(&config(), "a@b.c", "pw", Some("https://site.test/"));
    assert_eq!(req.url, "https://abc.supabase.co/auth/v1/signup");
    assert_eq!(req.query_value("redirect_to"), Some("https://site.test/"));

    let bare = sign_up_request(&config(), "a@b.c", "pw", None);
    assert!(bare.query.is_empty());
}

#[test]
fn refresh_and_user_requests() {
    let refresh = refresh_request(&config(), "r1");
    assert_eq!(refresh.query_value("grant_type"), Some("refresh_token"));
    assert_eq!(refresh.body, Some(json!({ "refresh_token": "r1" })));

    let me = user_request(&config(), "jwt");
    assert_eq!(me.method, Method::Get);
    assert_eq!(me.header("Authorization"), Some("Bearer jwt"));
}

#[test]
fn logout_accepts_gone_sessions() {
    for status in [200, 204, 401, 403, 404] {
        assert!(logout_accepted(status), "{status}");
    }
    for status in [400, 500, 503] {
        assert!(!logout_accepted(status), "{status}");
    }
}

// =============================================================================
// parse helpers
// =============================================================================

#[test]
fn sign_up_with_session_signs_in() {
    let body = session_json("a@b.c", "jwt", now() + 3600);
    assert!(matches!(parse_sign_up(&body, now()), Ok(SignUpOutcome::SignedIn(_))));
}

#[test]
fn sign_up_with_bare_user_needs_confirmation() {
    let outcome = parse_sign_up(&user_json("a@b.c"), now());
    assert_eq!(outcome, Ok(SignUpOutcome::ConfirmationSent(user("a@b.c"))));
}

#[test]
fn sign_up_with_garbage_is_decode_error() {
    assert!(matches!(parse_sign_up("[]", now()), Err(ApiError::Decode(_))));
}

#[test]
fn fragment_with_tokens_parses() {
    let tokens =
        parse_session_fragment("#access_token=a.b.c&expires_in=3600&refresh_token=r1&token_type=bearer&type=signup");
    assert_eq!(
        tokens,
        Some(FragmentTokens {
            access_token: "a.b.c".to_owned(),
            refresh_token: "r1".to_owned(),
            token_type: "bearer".to_owned(),
            expires_in: 3600,
            expires_at: None,
        })
    );
}

#[test]
fn fragment_values_are_percent_decoded() {
    let tokens = parse_session_fragment("#access_token=a%2Bb%3D&refresh_token=r%2F1&expires_in=3600&token_type=Bearer%20x");
    let tokens = tokens.expect("fragment should parse");
    assert_eq!(tokens.access_token, "a+b=");
    assert_eq!(tokens.refresh_token, "r/1");
    assert_eq!(tokens.token_type, "Bearer x");
}

#[test]
fn fragment_without_tokens_is_ignored() {
    assert!(parse_session_fragment("").is_none());
    assert!(parse_session_fragment("#section-2").is_none());
    assert!(parse_session_fragment("#access_token=a&expires_in=3600").is_none());
    assert!(parse_session_fragment("#access_token=a&refresh_token=r&expires_in=soon").is_none());
}

// =============================================================================
// sign in / sign up
// =============================================================================

#[test]
fn sign_in_persists_session_and_emits() {
    let f = fixture();
    f.transport.reply(200, &session_json("alice@example.com", "jwt", now() + 3600));

    let session = block_on(f.client.sign_in("alice@example.com", "pw"));
    assert_eq!(session.map(|s| s.access_token), Ok("jwt".to_owned()));
    assert!(f.client.stored_session().is_some());
    assert_eq!(*f.events.borrow(), vec![AuthEvent::SignedIn]);
}

#[test]
fn bad_credentials_are_auth_errors() {
    let f = fixture();
    f.transport.reply(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#);

    let err = block_on(f.client.sign_in("alice@example.com", "nope"));
    assert_eq!(err, Err(ApiError::Auth("Invalid login credentials".to_owned())));
    assert!(f.client.stored_session().is_none());
    assert!(f.events.borrow().is_empty());
}

#[test]
fn sign_up_awaiting_confirmation_stays_signed_out() {
    let f = fixture();
    f.transport.reply(200, &user_json("new@example.com"));

    let outcome = block_on(f.client.sign_up("new@example.com", "secret1", None));
    assert!(matches!(outcome, Ok(SignUpOutcome::ConfirmationSent(_))));
    assert!(f.client.stored_session().is_none());
    assert!(f.events.borrow().is_empty());
}

// =============================================================================
// sign out
// =============================================================================

#[test]
fn sign_out_revokes_and_clears() {
    let f = fixture();
    seed_session(&f, "jwt", now() + 3600);
    f.transport.reply(204, "");

    assert_eq!(block_on(f.client.sign_out()), Ok(()));
    let sent = f.transport.last();
    assert_eq!(sent.as_ref().and_then(|r| r.header("Authorization")), Some("Bearer jwt"));
    assert!(f.store.is_empty());
    assert_eq!(*f.events.borrow(), vec![AuthEvent::SignedOut]);
}

#[test]
fn sign_out_without_session_still_emits() {
    let f = fixture();
    assert_eq!(block_on(f.client.sign_out()), Ok(()));
    assert!(f.transport.sent().is_empty());
    assert_eq!(*f.events.borrow(), vec![AuthEvent::SignedOut]);
}

#[test]
fn failed_remote_logout_still_clears_locally() {
    let f = fixture();
    seed_session(&f, "jwt", now() + 3600);
    f.transport.fail(ApiError::Network("offline".to_owned()));

    assert!(block_on(f.client.sign_out()).is_err());
    assert!(f.client.stored_session().is_none());
    assert_eq!(*f.events.borrow(), vec![AuthEvent::SignedOut]);
}

// =============================================================================
// session / current_user
// =============================================================================

#[test]
fn fresh_session_is_used_without_refresh() {
    let f = fixture();
    seed_session(&f, "jwt", now() + 3600);
    f.transport.reply(200, &user_json("alice@example.com"));

    assert_eq!(block_on(f.client.current_user()), Some(user("alice@example.com")));
    assert_eq!(f.transport.sent().len(), 1);
}

#[test]
fn expiring_session_is_refreshed_first() {
    let f = fixture();
    seed_session(&f, "old", now() + 5);
    f.transport
        .reply(200, &session_json("alice@example.com", "new", now() + 3600))
        .reply(200, &user_json("alice@example.com"));

    assert!(block_on(f.client.current_user()).is_some());
    let sent = f.transport.sent();
    assert_eq!(sent[0].query_value("grant_type"), Some("refresh_token"));
    assert_eq!(sent[1].header("Authorization"), Some("Bearer new"));
    assert_eq!(f.client.stored_session().map(|s| s.access_token), Some("new".to_owned()));
    assert_eq!(*f.events.borrow(), vec![AuthEvent::TokenRefreshed]);
}

#[test]
fn rejected_refresh_signs_out_locally() {
    let f = fixture();
    seed_session(&f, "old", now() - 60);
    f.transport.reply(400, r#"{"error_description":"Invalid Refresh Token"}"#);

    assert!(block_on(f.client.session()).is_none());
    assert!(f.client.stored_session().is_none());
    assert_eq!(*f.events.borrow(), vec![AuthEvent::SignedOut]);
}

#[test]
fn refresh_network_failure_keeps_stored_session() {
    let f = fixture();
    seed_session(&f, "old", now() - 60);
    f.transport.fail(ApiError::Network("offline".to_owned()));

    assert!(block_on(f.client.session()).is_none());
    assert!(f.client.stored_session().is_some());
}

#[test]
fn no_session_means_no_user_and_no_request() {
    let f = fixture();
    assert!(block_on(f.client.current_user()).is_none());
    assert!(f.transport.sent().is_empty());
}

#[test]
fn unreadable_stored_session_is_discarded() {
    let f = fixture();
    f.store.set(&config().session_storage_key(), "{not json");
    assert!(f.client.stored_session().is_none());
    assert!(f.store.is_empty());
}

#[test]
fn session_expiry_follows_the_clock() {
    let f = fixture();
    seed_session(&f, "jwt", now() + 3600);
    f.clock.advance(time::Duration::hours(2));
    f.transport.fail(ApiError::Network("offline".to_owned()));

    assert!(block_on(f.client.session()).is_none());
    assert_eq!(f.transport.sent()[0].query_value("grant_type"), Some("refresh_token"));
}

// =============================================================================
// fragment adoption
// =============================================================================

#[test]
fn adopting_fragment_persists_and_emits() {
    let f = fixture();
    f.transport.reply(200, &user_json("new@example.com"));

    let adopted = block_on(f.client.adopt_session_fragment("#access_token=jwt&refresh_token=r&expires_in=3600"));
    assert_eq!(adopted, Ok(Some(user("new@example.com"))));
    let stored = f.client.stored_session();
    assert_eq!(stored.as_ref().and_then(|s| s.expires_at), Some(now() + 3600));
    assert_eq!(*f.events.borrow(), vec![AuthEvent::SignedIn]);
}

#[test]
fn plain_fragment_is_not_adopted() {
    let f = fixture();
    assert_eq!(block_on(f.client.adopt_session_fragment("#top")), Ok(None));
    assert!(f.transport.sent().is_empty());
}

// =============================================================================
// subscriptions
// =============================================================================

#[test]
fn dropping_subscription_stops_delivery() {
    let f = fixture();
    let extra = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&extra);
    let sub = f.client.on_auth_state_change(move |_| *sink.borrow_mut() += 1);
    assert_eq!(f.client.listener_count(), 2);

    f.client.emit(&AuthChange::signed_out());
    sub.unsubscribe();
    f.client.emit(&AuthChange::signed_out());

    assert_eq!(*extra.borrow(), 1);
    assert_eq!(f.client.listener_count(), 1);
    assert_eq!(f.events.borrow().len(), 2);
}

#[test]
fn listeners_run_in_subscription_order() {
    let f = fixture();
    let order = Rc::new(RefCell::new(Vec::new()));
    let (a, b) = (Rc::clone(&order), Rc::clone(&order));
    let _first = f.client.on_auth_state_change(move |_| a.borrow_mut().push(1));
    let _second = f.client.on_auth_state_change(move |_| b.borrow_mut().push(2));

    f.client.emit(&AuthChange::signed_out());
    assert_eq!(*order.borrow(), vec![1, 2]);
}
