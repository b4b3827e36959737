//! `remixstage://` OAuth callback links.

/// URL scheme registered with the OS.
pub const CALLBACK_SCHEME: &str = "remixstage";

/// Whether a URL is an OAuth callback for this app.
pub fn is_callback_url(url: &str) -> bool {
    url.strip_prefix(CALLBACK_SCHEME)
        .is_some_and(|rest| rest.starts_with("://"))
}

/// First callback URL in a launch argument list (second-instance argv).
pub fn find_callback_url<S: AsRef<str>>(args: &[S]) -> Option<&str> {
    args.iter().map(AsRef::as_ref).find(|arg| is_callback_url(arg))
}
