// self
use crate::{_prelude::*, token::CsrfToken};

/// JSON body returned by the token route.
///
/// Every field may be omitted by the server; missing values deserialize as empty strings and an
/// empty token is rejected by the coordinator rather than cached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenIssue {
	/// Request header the server reads the token from.
	pub header_name: String,
	/// Form field the server reads the token from.
	pub field_name: String,
	/// Issued token value.
	pub token: CsrfToken,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn issue_uses_camel_case_fields() {
		let issue: TokenIssue = serde_json::from_str(
			"{\"headerName\":\"X-CSRF-Token\",\"fieldName\":\"csrf\",\"token\":\"tok-1\"}",
		)
		.expect("Token issue fixture should deserialize.");

		assert_eq!(issue.header_name, "X-CSRF-Token");
		assert_eq!(issue.field_name, "csrf");
		assert_eq!(issue.token.expose(), "tok-1");
	}

	#[test]
	fn omitted_fields_default_to_empty() {
		let issue: TokenIssue =
			serde_json::from_str("{}").expect("Empty token issue should deserialize.");

		assert!(issue.token.is_empty());
		assert!(issue.header_name.is_empty());
	}
}
