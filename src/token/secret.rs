//! Redacted wrapper for CSRF token values.

// self
use crate::_prelude::*;

/// CSRF token value that keeps its contents out of logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken(String);
impl CsrfToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the token carries no value, which counts as unset.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for CsrfToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for CsrfToken {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for CsrfToken {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for CsrfToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CsrfToken").field(&"<redacted>").finish()
	}
}
impl Display for CsrfToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = CsrfToken::new("super-secret");

		assert_eq!(format!("{token:?}"), "CsrfToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.expose(), "super-secret");
	}
}
