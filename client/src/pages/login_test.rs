use super::*;

#[test]
fn validate_credentials_trims_email() {
    assert_eq!(
        validate_credentials("  user@example.com  ", "secret1"),
        Ok(("user@example.com".to_owned(), "secret1".to_owned()))
    );
}

#[test]
fn validate_credentials_requires_both_fields() {
    assert_eq!(validate_credentials("   ", "secret1"), Err("Please enter your email and password."));
    assert_eq!(validate_credentials("a@b.com", ""), Err("Please enter your email and password."));
}

#[test]
fn validate_credentials_rejects_malformed_email() {
    for email in ["plain", "@example.com", "user@localhost", "user@.com"] {
        assert_eq!(validate_credentials(email, "secret1"), Err("Please enter a valid email address."), "{email}");
    }
}

#[test]
fn validate_credentials_enforces_password_length() {
    assert_eq!(validate_credentials("a@b.com", "12345"), Err("Password must be at least 6 characters."));
    assert!(validate_credentials("a@b.com", "123456").is_ok());
}

#[test]
fn password_is_not_trimmed() {
    assert_eq!(validate_credentials("a@b.com", " pass1 ").map(|(_, p)| p), Ok(" pass1 ".to_owned()));
}
