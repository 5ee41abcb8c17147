//! Spans correlating the log lines of one command.

use salesdesk_core::RequestId;
use tracing::Span;

/// Span for one CLI command, tagged with a fresh request ID.
pub fn command_span(command: &str) -> (RequestId, Span) {
    let id = RequestId::generate();
    let span = tracing::info_span!("command", command, request_id = %id);
    (id, span)
}
