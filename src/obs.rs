//! Optional observability helpers for token and resource calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `listrak.operation` with the
//!   `kind` (`token` or `api`) and `operation` fields, plus debug/info events around token
//!   refreshes. Secrets are never recorded.
//! - Enable `metrics` to increment the `listrak_operation_total` counter for every
//!   attempt/success/failure, labeled by `kind`, `operation`, and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Emits a `tracing` event when the `tracing` feature is enabled.
macro_rules! event {
	($level:ident, $($arg:tt)+) => {
		#[cfg(feature = "tracing")]
		::tracing::$level!($($arg)+);
	};
}
pub(crate) use event;

/// Families of outbound calls observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// OAuth token endpoint exchange.
	Token,
	/// `/email/v1` resource call.
	Api,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Token => "token",
			OperationKind::Api => "api",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records attempt + outcome counters around it.
pub(crate) async fn observe<T, Fut>(
	kind: OperationKind,
	operation: &'static str,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, operation);

	record_operation_outcome(kind, operation, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_operation_outcome(kind, operation, OperationOutcome::Success),
		Err(_err) => {
			event!(debug, kind = kind.as_str(), operation, error = %_err, "Listrak call failed.");

			record_operation_outcome(kind, operation, OperationOutcome::Failure);
		},
	}

	result
}
