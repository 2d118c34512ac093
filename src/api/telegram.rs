//! [Telegram Bot API](https://core.telegram.org/bots/api) client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::prelude::*;

#[must_use]
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ChatId(pub i64);

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn new(bot_token: &str) -> Result<Self> {
        ensure!(!bot_token.is_empty(), "the bot token must not be empty");
        let base_url = Url::parse(&format!("https://api.telegram.org/bot{bot_token}/"))
            .context("invalid bot token")?;
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, base_url })
    }

    #[instrument(skip_all, fields(chat_id = %chat_id))]
    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: ChatId,
            text: &'a str,
            parse_mode: &'static str,
        }

        debug!("sending…");
        self.post(
            "sendMessage",
            &SendMessageRequest { chat_id, text, parse_mode: "Markdown" },
            None,
        )
        .await
    }

    /// Long-poll for incoming updates.
    #[instrument(skip_all, fields(offset = ?offset))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<i64>,

            timeout: u64,

            allowed_updates: [&'static str; 1],
        }

        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: ["message"],
        };
        let updates: Vec<Update> =
            self.post("getUpdates", &request, Some(timeout + Duration::from_secs(10))).await?;
        debug!(n_updates = updates.len(), "received");
        Ok(updates)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(method = method))]
    async fn post<B, R>(&self, method: &str, body: &B, timeout: Option<Duration>) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.base_url.join(method)?).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        request
            .send()
            .await
            .with_context(|| format!("failed to call `{method}`"))?
            .json::<Response<R>>()
            .await
            .with_context(|| format!("failed to deserialize `{method}` response JSON"))?
            .into()
    }
}

/// Generic Bot API response envelope.
#[derive(Deserialize)]
struct Response<R> {
    ok: bool,
    result: Option<R>,
    description: Option<String>,
    error_code: Option<i32>,
}

impl<R> From<Response<R>> for Result<R> {
    fn from(response: Response<R>) -> Self {
        match response {
            Response { ok: true, result: Some(result), .. } => Ok(result),
            Response { ok: true, result: None, .. } => bail!("Telegram returned no result"),
            Response { description: Some(description), error_code, .. } => {
                bail!(r#"Telegram error {error_code:?} ("{description}")"#)
            }
            Response { error_code, .. } => bail!("Telegram error {error_code:?}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_updates_ok() -> Result {
        // language=json
        let body = r#"{
            "ok": true,
            "result": [
                {
                    "update_id": 815,
                    "message": {
                        "message_id": 1,
                        "from": {"id": 42, "is_bot": false, "first_name": "Olena"},
                        "chat": {"id": 42, "type": "private", "first_name": "Olena"},
                        "date": 1760400000,
                        "text": "/start"
                    }
                },
                {"update_id": 816}
            ]
        }"#;
        let result: Result<Vec<Update>> = serde_json::from_str::<Response<_>>(body)?.into();
        let updates = result?;
        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, ChatId(42));
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert!(updates[1].message.is_none());
        Ok(())
    }

    #[test]
    fn test_error_response_err() -> Result {
        // language=json
        let body = r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was blocked by the user"}"#;
        let result: Result<Message> = serde_json::from_str::<Response<_>>(body)?.into();
        let error = result.unwrap_err().to_string();
        assert!(error.contains("403"), "{error}");
        assert!(error.contains("blocked"), "{error}");
        Ok(())
    }

    #[test]
    fn test_chat_id_ok() -> Result {
        assert_eq!("-100123".parse::<ChatId>()?, ChatId(-100_123));
        assert_eq!(ChatId(42).to_string(), "42");
        assert_eq!(serde_json::to_string(&ChatId(7))?, "7");
        Ok(())
    }

    #[test]
    fn test_empty_token_err() {
        assert!(Api::new("").is_err());
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_get_updates_ok() -> Result {
        let api = Api::new(&std::env::var("TELEGRAM_BOT_TOKEN")?)?;
        let _ = api.get_updates(None, Duration::ZERO).await?;
        Ok(())
    }
}
