//! Optional observability helpers for token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every acquisition inside a span named `csrf_singleflight.ensure`
//!   with a `stage` (call site) field.
//! - Enable `metrics` to increment the `csrf_singleflight_ensure_total` counter for every
//!   attempt and its resolution, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnsureOutcome {
	/// Entry to [`TokenCoordinator::ensure_token`](crate::coordinator::TokenCoordinator::ensure_token).
	Attempt,
	/// A cached token was already valid.
	Reused,
	/// This caller led a flight that stored a fresh token.
	Fetched,
	/// This caller waited on another caller's flight.
	Joined,
	/// The flight led by this caller failed.
	Failure,
}
impl EnsureOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EnsureOutcome::Attempt => "attempt",
			EnsureOutcome::Reused => "reused",
			EnsureOutcome::Fetched => "fetched",
			EnsureOutcome::Joined => "joined",
			EnsureOutcome::Failure => "failure",
		}
	}
}
impl Display for EnsureOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
