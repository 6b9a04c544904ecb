//! Chat API client methods and the polling message stream

use futures::Stream;
use reqwest::Method;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use super::{ClientError, VoltbayClient};
use crate::types::{CreateChatRequest, SendMessageRequest};
use voltbay_core::types::{Chat, ChatMessage};

/// Poll cadence for [`VoltbayClient::watch_messages`] when the caller
/// has no preference.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Page size used when fetching message history.
pub const DEFAULT_MESSAGE_PAGE_SIZE: u32 = 50;

impl VoltbayClient {
    /// All chats the authenticated user participates in.
    pub async fn list_chats(&self) -> Result<Vec<Chat>, ClientError> {
        self.send(Method::GET, "/chats", None, None).await
    }

    /// Fetch a single chat by id.
    pub async fn get_chat(&self, id: &str) -> Result<Chat, ClientError> {
        self.send(Method::GET, &format!("/chats/{id}"), None, None)
            .await
    }

    /// Open (or rejoin) the buyer/seller chat for a listing.
    pub async fn open_chat(&self, request: &CreateChatRequest) -> Result<Chat, ClientError> {
        self.send(
            Method::POST,
            "/chats",
            Some(serde_json::to_value(request)?),
            None,
        )
        .await
    }

    /// Mark a chat as read.
    pub async fn mark_chat_read(&self, chat_id: &str) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &format!("/chats/{chat_id}/read"), None, None)
            .await
    }

    /// One page of a chat's message history.
    pub async fn chat_messages(
        &self,
        chat_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        self.send(
            Method::GET,
            &format!("/chats/{chat_id}/messages"),
            None,
            Some(vec![
                ("page".to_string(), page.to_string()),
                ("pageSize".to_string(), page_size.to_string()),
            ]),
        )
        .await
    }

    /// Post a message into a chat.
    pub async fn send_chat_message(
        &self,
        chat_id: &str,
        request: &SendMessageRequest,
    ) -> Result<ChatMessage, ClientError> {
        self.send(
            Method::POST,
            &format!("/chats/{chat_id}/messages"),
            Some(serde_json::to_value(request)?),
            None,
        )
        .await
    }

    /// Fixed-interval polling stream of chat messages.
    ///
    /// The first poll fires immediately and yields the current history;
    /// every later poll yields only messages not seen before. Fetch
    /// errors are yielded as `Err` items and polling continues, so a
    /// transient failure does not end the stream. Drop the stream to
    /// stop polling. There is no push channel behind this; it is the
    /// same pull endpoint on a timer.
    pub fn watch_messages(
        &self,
        chat_id: impl Into<String>,
        poll_interval: Duration,
    ) -> impl Stream<Item = Result<ChatMessage, ClientError>> + Send + 'static {
        // tokio intervals reject a zero period
        let poll_interval = poll_interval.max(Duration::from_millis(1));
        let state = WatchState {
            client: self.clone(),
            chat_id: chat_id.into(),
            interval: tokio::time::interval(poll_interval),
            seen: HashSet::new(),
            pending: VecDeque::new(),
        };

        futures::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(message) = state.pending.pop_front() {
                    return Some((Ok(message), state));
                }

                state.interval.tick().await;
                match state
                    .client
                    .chat_messages(&state.chat_id, 1, DEFAULT_MESSAGE_PAGE_SIZE)
                    .await
                {
                    Ok(messages) => {
                        for message in messages {
                            if state.seen.insert(message_key(&message)) {
                                state.pending.push_back(message);
                            }
                        }
                    }
                    Err(err) => return Some((Err(err), state)),
                }
            }
        })
    }
}

struct WatchState {
    client: VoltbayClient,
    chat_id: String,
    interval: tokio::time::Interval,
    seen: HashSet<String>,
    pending: VecDeque<ChatMessage>,
}

/// Dedup key for a polled message. Server-assigned ids are stable;
/// messages without one fall back to timestamp plus content.
fn message_key(message: &ChatMessage) -> String {
    match &message.id {
        Some(id) => id.clone(),
        None => format!(
            "{}:{}",
            message
                .created_at
                .map(|t| t.timestamp_millis())
                .unwrap_or_default(),
            message.content
        ),
    }
}
