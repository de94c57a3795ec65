//! Caller identity from proxy headers and admin gating.
//!
//! The authenticating reverse proxy in front of this service verifies the
//! session and forwards the caller's user id and email. This module only
//! reads those headers; it performs no authentication of its own.

use axum::http::HeaderMap;

use tally_core::UserId;

use crate::error::ApiError;

/// Header carrying the verified user id.
pub const USER_HEADER: &str = "x-tally-user";

/// Header carrying the verified email.
pub const EMAIL_HEADER: &str = "x-tally-email";

/// The caller's user id, if forwarded.
#[must_use]
pub fn caller_user(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(UserId::from)
}

/// The caller's email, if forwarded.
#[must_use]
pub fn caller_email(headers: &HeaderMap) -> Option<String> {
    headers
        .get(EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Reject callers whose email is not on the fixed allow-list.
///
/// Missing identity is `Unauthenticated`; a known identity outside the
/// list is `Forbidden`. An empty list locks the admin surface entirely.
pub fn require_admin(headers: &HeaderMap, allow_list: &[String]) -> Result<(), ApiError> {
    let email = caller_email(headers).ok_or(ApiError::Unauthenticated)?;
    let allowed = allow_list
        .iter()
        .any(|entry| entry.eq_ignore_ascii_case(&email));
    if allowed { Ok(()) } else { Err(ApiError::Forbidden) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(email: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(email) = email {
            let _ = headers.insert(EMAIL_HEADER, HeaderValue::from_str(email).unwrap());
        }
        headers
    }

    #[test]
    fn missing_identity_is_unauthenticated() {
        let err = require_admin(&headers(None), &["ops@tally.app".into()]).unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[test]
    fn unknown_email_is_forbidden() {
        let err =
            require_admin(&headers(Some("user@tally.app")), &["ops@tally.app".into()]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn listed_email_passes_case_insensitively() {
        require_admin(&headers(Some("Ops@Tally.App")), &["ops@tally.app".into()]).unwrap();
    }

    #[test]
    fn empty_allow_list_locks_the_surface() {
        let err = require_admin(&headers(Some("ops@tally.app")), &[]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn caller_user_reads_header() {
        let mut h = HeaderMap::new();
        let _ = h.insert(USER_HEADER, HeaderValue::from_static("u1"));
        assert_eq!(caller_user(&h), Some(UserId::from("u1")));
        assert_eq!(caller_user(&HeaderMap::new()), None);
    }
}
