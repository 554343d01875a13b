// self
use crate::obs::EnsureOutcome;

/// Records an acquisition outcome via the global metrics recorder (when enabled).
pub fn record_ensure_outcome(outcome: EnsureOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("csrf_singleflight_ensure_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_ensure_outcome_noop_without_metrics() {
		record_ensure_outcome(EnsureOutcome::Failure);
	}
}
