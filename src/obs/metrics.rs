// self
use crate::obs::{OperationKind, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(
	kind: OperationKind,
	operation: &'static str,
	outcome: OperationOutcome,
) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"listrak_operation_total",
			"kind" => kind.as_str(),
			"operation" => operation,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, operation, outcome);
	}
}
