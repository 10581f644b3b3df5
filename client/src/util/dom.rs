//! Small browser helpers; inert on the server build.

/// Blocking `window.confirm`. Always `false` outside the browser.
pub fn confirm(message: &str) -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().and_then(|w| w.confirm_with_message(message).ok()).unwrap_or(false)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = message;
        false
    }
}

/// Blocking `window.alert` for failures the user must acknowledge.
pub fn alert(message: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = message;
    }
}

/// Absolute URL of the site root, used as the sign-up confirmation target.
pub fn site_root() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let origin = web_sys::window()?.location().origin().ok()?;
        Some(format!("{origin}/"))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}
