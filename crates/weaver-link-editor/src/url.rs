//! Normalizing user-typed link targets into absolute URLs.

use miette::Diagnostic;
use ::url::{ParseError, Url};

/// Schemes a link may point at. Anything else (`javascript:`, `data:`, ...) is refused.
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "mailto", "sms", "tel"];

/// Scheme assumed when the user types a bare host such as `example.com`.
pub const DEFAULT_SCHEME: &str = "https";

#[derive(thiserror::Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum UrlError {
    #[error("link target is empty")]
    #[diagnostic(code(weaver::link_editor::url::empty))]
    Empty,

    #[error("unsupported link scheme `{0}`")]
    #[diagnostic(
        code(weaver::link_editor::url::scheme),
        help("links may use http, https, mailto, sms or tel")
    )]
    UnsupportedScheme(String),

    #[error("malformed link target: {0}")]
    #[diagnostic(code(weaver::link_editor::url::malformed))]
    Malformed(#[from] ParseError),
}

/// Turn a draft into a safe absolute URL.
///
/// Input that already parses with a supported scheme is returned as typed
/// (trimmed), so `https://example.com` does not gain a trailing slash.
/// Scheme-less input is treated as a host and prefixed with `https://`.
pub fn sanitize_url(input: &str) -> Result<String, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    match Url::parse(trimmed) {
        Ok(url) if SUPPORTED_SCHEMES.contains(&url.scheme()) => Ok(trimmed.to_owned()),
        // `localhost:3000` and `example.com:8080` parse with the host as the scheme.
        Ok(_) if !trimmed.contains("://") => with_default_scheme(trimmed),
        Ok(url) => Err(UrlError::UnsupportedScheme(url.scheme().to_owned())),
        Err(ParseError::RelativeUrlWithoutBase) => with_default_scheme(trimmed),
        Err(e) => Err(e.into()),
    }
}

fn with_default_scheme(host_and_path: &str) -> Result<String, UrlError> {
    let candidate = format!("{DEFAULT_SCHEME}://{host_and_path}");
    let url = Url::parse(&candidate)?;
    if url.host().is_none() {
        return Err(ParseError::EmptyHost.into());
    }
    Ok(candidate)
}
