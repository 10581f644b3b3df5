use super::*;

#[test]
fn known_pages_map_to_routes() {
    assert_eq!(target("index.html"), Some("/"));
    assert_eq!(target("login.html"), Some("/login"));
    assert_eq!(target("subjects.html"), Some("/subjects"));
    assert_eq!(target("reviews.html"), Some("/reviews"));
}

#[test]
fn unknown_pages_have_no_target() {
    assert_eq!(target("admin.html"), None);
    assert_eq!(target("index.htm"), None);
    assert_eq!(location("../etc/passwd", None), None);
}

#[test]
fn query_string_is_preserved() {
    assert_eq!(location("reviews.html", Some("subject=Physics")).as_deref(), Some("/reviews?subject=Physics"));
    assert_eq!(location("index.html", Some("")).as_deref(), Some("/"));
}

#[tokio::test]
async fn handler_redirects_permanently() {
    let resp = redirect(Path("login.html".to_owned()), RawQuery(None)).await;
    assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(resp.headers().get("location").and_then(|v| v.to_str().ok()), Some("/login"));
}

#[tokio::test]
async fn handler_rejects_unknown_pages() {
    let resp = redirect(Path("missing.html".to_owned()), RawQuery(None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
