//! Forwards upstream fragments to the HTTP response.
//!
//! One invocation moves through
//! `AwaitingUpstream -> {Streaming -> Closed | Aborted} | RejectedBeforeStream`.
//! The handler drives the first two phases and [`prime`]; once a fragment
//! has arrived the status is committed and [`spawn_relay`] takes over.

use bytes::Bytes;
use futures::StreamExt;
use std::fmt;
use std::time::Duration;
use taskpad_llm::{LLMChunk, LLMStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::error::{AppError, RelayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPhase {
    AwaitingUpstream,
    Streaming,
    Closed,
    Aborted,
    RejectedBeforeStream,
}

impl fmt::Display for RelayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelayPhase::AwaitingUpstream => "awaiting_upstream",
            RelayPhase::Streaming => "streaming",
            RelayPhase::Closed => "closed",
            RelayPhase::Aborted => "aborted",
            RelayPhase::RejectedBeforeStream => "rejected_before_stream",
        };
        f.write_str(name)
    }
}

/// Outcome of waiting for the first upstream fragment.
pub enum Primed {
    Streaming { first: String, rest: LLMStream },
    /// Upstream finished without producing any text.
    Empty,
}

/// Wait for the first non-empty fragment.
///
/// Anything that goes wrong here can still be reported with a status code.
pub async fn prime(mut upstream: LLMStream, idle_timeout: Duration) -> Result<Primed, AppError> {
    loop {
        match timeout(idle_timeout, upstream.next()).await {
            Err(_) => {
                tracing::warn!(phase = %RelayPhase::RejectedBeforeStream, "no fragment within {:?}", idle_timeout);
                return Err(AppError::UpstreamRejected { credential: false });
            }
            Ok(None) | Ok(Some(Ok(LLMChunk::Done))) => return Ok(Primed::Empty),
            Ok(Some(Ok(LLMChunk::Token(text)))) => {
                if text.is_empty() {
                    continue;
                }
                return Ok(Primed::Streaming {
                    first: text,
                    rest: upstream,
                });
            }
            Ok(Some(Err(err))) => {
                tracing::warn!(phase = %RelayPhase::RejectedBeforeStream, "upstream failed before first fragment: {}", err);
                return Err(AppError::from_upstream(&err));
            }
        }
    }
}

/// Move the rest of the upstream stream onto a bounded channel from a
/// background task and return the receiving end as a response body stream.
///
/// The task stops when upstream ends, fails, goes idle, or the receiver is
/// dropped. Stopping drops `rest`, which releases the upstream connection.
pub fn spawn_relay(
    first: String,
    rest: LLMStream,
    idle_timeout: Duration,
    capacity: usize,
) -> ReceiverStream<Result<Bytes, RelayError>> {
    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(
        async move {
            let phase = pump(first, rest, tx, idle_timeout).await;
            tracing::debug!(phase = %phase, "relay finished");
        }
        .instrument(tracing::Span::current()),
    );

    ReceiverStream::new(rx)
}

async fn pump(
    first: String,
    mut upstream: LLMStream,
    tx: mpsc::Sender<Result<Bytes, RelayError>>,
    idle_timeout: Duration,
) -> RelayPhase {
    let mut fragments = 1usize;
    let mut bytes_sent = first.len();

    if tx.send(Ok(Bytes::from(first))).await.is_err() {
        tracing::debug!("client went away before the first fragment was written");
        return RelayPhase::Aborted;
    }

    loop {
        let next = tokio::select! {
            _ = tx.closed() => {
                tracing::debug!(fragments, bytes_sent, "client disconnected, dropping upstream");
                return RelayPhase::Aborted;
            }
            next = timeout(idle_timeout, upstream.next()) => next,
        };

        match next {
            Err(_) => {
                tracing::warn!(fragments, "upstream idle for {:?}, aborting response", idle_timeout);
                let _ = tx.send(Err(RelayError::IdleTimeout(idle_timeout))).await;
                return RelayPhase::Aborted;
            }
            Ok(None) | Ok(Some(Ok(LLMChunk::Done))) => {
                tracing::debug!(fragments, bytes_sent, "upstream completed");
                return RelayPhase::Closed;
            }
            Ok(Some(Ok(LLMChunk::Token(text)))) => {
                if text.is_empty() {
                    continue;
                }
                fragments += 1;
                bytes_sent += text.len();
                if tx.send(Ok(Bytes::from(text))).await.is_err() {
                    tracing::debug!(fragments, "client disconnected, dropping upstream");
                    return RelayPhase::Aborted;
                }
            }
            Ok(Some(Err(err))) => {
                tracing::error!(fragments, "upstream failed mid-stream: {}", err);
                let _ = tx.send(Err(RelayError::Upstream(err.to_string()))).await;
                return RelayPhase::Aborted;
            }
        }
    }
}
