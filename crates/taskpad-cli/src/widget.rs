//! Chat widget state plus the client side of `POST /api/chat`.

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use taskpad_core::{ChatTranscript, ConversationHistory, HistoryTurn};

use crate::decoder::Utf8StreamDecoder;

pub const FALLBACK_ERROR: &str = "Failed to get response";
pub const INTERRUPTED_ERROR: &str = "The response was interrupted. Please try again.";
pub const TRANSPORT_ERROR: &str = "Sorry, something went wrong. Please try again.";

/// Result of one [`ChatWidget::send`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// Blank input; nothing was sent.
    Skipped,
    /// The full reply text.
    Completed(String),
    /// The error text now shown in place of the reply.
    Failed(String),
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    message: &'a str,
    history: &'a [HistoryTurn],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct ChatWidget {
    client: Client,
    endpoint: String,
    transcript: ChatTranscript,
    history: ConversationHistory,
}

impl ChatWidget {
    pub fn new(server_url: &str) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(client: Client, server_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/chat", server_url.trim_end_matches('/')),
            transcript: ChatTranscript::new(),
            history: ConversationHistory::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Send one message and stream the reply into the transcript.
    ///
    /// `on_update` receives each decoded fragment as it arrives. History only
    /// grows when the reply stream ends cleanly; a failed exchange leaves it
    /// untouched so the next attempt sends the same context.
    pub async fn send<F>(&mut self, input: &str, mut on_update: F) -> Exchange
    where
        F: FnMut(&str),
    {
        let message = input.trim();
        if message.is_empty() {
            return Exchange::Skipped;
        }

        self.transcript.push_user(message);
        let slot = self.transcript.begin_reply();

        let payload = ChatPayload {
            message,
            history: self.history.turns(),
        };
        let response = match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(_) => return self.fail(slot, TRANSPORT_ERROR),
        };

        if !response.status().is_success() {
            let error = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            return self.fail(slot, error);
        }

        let mut decoder = Utf8StreamDecoder::new();
        let mut reply = String::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(_) => return self.fail(slot, INTERRUPTED_ERROR),
            };
            let text = decoder.decode(&bytes);
            if text.is_empty() {
                continue;
            }
            reply.push_str(&text);
            self.transcript.update_reply(slot, reply.as_str());
            on_update(&text);
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            reply.push_str(&tail);
            on_update(&tail);
        }

        self.transcript.finish_reply(slot, reply.as_str());
        self.history.record_exchange(message, reply.as_str());
        Exchange::Completed(reply)
    }

    fn fail(&mut self, slot: usize, error: impl Into<String>) -> Exchange {
        let error = error.into();
        self.transcript.fail_reply(slot, error.as_str());
        Exchange::Failed(error)
    }
}
