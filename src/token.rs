//! CSRF token primitives: the redacted token value, the token route's response body, and the
//! network-free freshness check.

mod issue;
mod secret;

pub use issue::TokenIssue;
pub use secret::CsrfToken;

/// Returns `true` iff `candidate` is present and non-empty.
pub fn is_valid(candidate: Option<&CsrfToken>) -> bool {
	candidate.is_some_and(|token| !token.is_empty())
}
