//! Lichess bot API client.
//!
//! Endpoints used:
//!
//! ```text
//! GET  /api/stream/event                  account events (NDJSON)
//! GET  /api/bot/game/stream/{id}          game events (NDJSON)
//! POST /api/challenge/{id}/accept
//! POST /api/challenge/{id}/decline        form: reason
//! POST /api/bot/game/{id}/move/{move}
//! POST /api/bot/game/{id}/chat            form: room, text
//! ```
//!
//! Streams are newline-delimited JSON with blank keep-alive lines in
//! between. Records that fail to decode are logged and skipped.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, warn};

use bot_core::{DeclineReason, GameEvent, IncomingEvent};

use crate::server::{EventStream, GameServer, ServerError};

pub struct LichessClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl LichessClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("plybot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(LichessClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<(), ServerError> {
        let mut request = self.http.post(self.url(path)).bearer_auth(&self.token);
        if !form.is_empty() {
            request = request.form(form);
        }

        let response = request.send().await?;
        check_status(response).await.map(|_| ())
    }

    async fn stream<T>(
        &self,
        path: &str,
        decode: fn(&str) -> Result<T, serde_json::Error>,
    ) -> Result<EventStream<T>, ServerError>
    where
        T: Send + 'static,
    {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_status(response).await?;
        debug!(path, "stream opened");

        let records = ndjson_lines(Box::pin(response.bytes_stream())).filter_map(move |line| {
            let record = match line {
                Err(e) => Some(Err(e)),
                Ok(line) if line.is_empty() => None,
                Ok(line) => match decode(&line) {
                    Ok(record) => Some(Ok(record)),
                    Err(e) => {
                        warn!("skipping undecodable record {:?}: {}", line, e);
                        None
                    }
                },
            };
            futures::future::ready(record)
        });

        Ok(records.boxed())
    }
}

#[async_trait]
impl GameServer for LichessClient {
    async fn incoming_events(&self) -> Result<EventStream<IncomingEvent>, ServerError> {
        self.stream("/api/stream/event", IncomingEvent::from_json).await
    }

    async fn game_events(&self, game_id: &str) -> Result<EventStream<GameEvent>, ServerError> {
        self.stream(&format!("/api/bot/game/stream/{}", game_id), GameEvent::from_json)
            .await
    }

    async fn accept_challenge(&self, challenge_id: &str) -> Result<(), ServerError> {
        self.post(&format!("/api/challenge/{}/accept", challenge_id), &[])
            .await
    }

    async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: DeclineReason,
    ) -> Result<(), ServerError> {
        self.post(
            &format!("/api/challenge/{}/decline", challenge_id),
            &[("reason", reason.as_str())],
        )
        .await
    }

    async fn make_move(&self, game_id: &str, mv: &str) -> Result<(), ServerError> {
        self.post(&format!("/api/bot/game/{}/move/{}", game_id, mv), &[])
            .await
    }

    async fn post_chat(&self, game_id: &str, text: &str) -> Result<(), ServerError> {
        self.post(
            &format!("/api/bot/game/{}/chat", game_id),
            &[("room", "player"), ("text", text)],
        )
        .await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ServerError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Split a byte stream into trimmed text lines. A trailing line without
/// newline is emitted when the body ends.
pub fn ndjson_lines<S, E>(body: S) -> impl Stream<Item = Result<String, ServerError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: Into<ServerError> + Send,
{
    stream::unfold(
        (body, BytesMut::new(), false),
        |(mut body, mut buf, mut done)| async move {
            loop {
                if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                    let line = buf.split_to(pos + 1);
                    let text = String::from_utf8_lossy(&line).trim().to_string();
                    return Some((Ok(text), (body, buf, done)));
                }

                if done {
                    if buf.is_empty() {
                        return None;
                    }
                    let text = String::from_utf8_lossy(&buf).trim().to_string();
                    buf.clear();
                    return Some((Ok(text), (body, buf, done)));
                }

                match body.next().await {
                    Some(Ok(chunk)) => buf.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        buf.clear();
                        return Some((Err(e.into()), (body, buf, true)));
                    }
                    None => done = true,
                }
            }
        },
    )
}
