use super::*;
use crate::session::testing::user;

#[test]
fn default_is_loading_and_signed_out() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(!state.is_signed_in());
}

#[test]
fn signed_in_link_welcomes_user() {
    let state = AuthState::signed_in(user("alice@example.com"));
    assert!(!state.loading);
    assert_eq!(
        state.login_link(),
        LoginLink { label: "Welcome, alice@example.com".to_owned(), href: "/subjects" }
    );
}

#[test]
fn signed_out_link_points_to_login() {
    let link = AuthState::signed_out().login_link();
    assert_eq!(link.label, "Login");
    assert_eq!(link.href, "/login");
}
