//! Debater backends: OpenAI-compatible HTTP and a scripted offline debater.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use coordination::{DebaterBackend, GenerationContext, GenerationError, Position, RoundType};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::EndpointConfig;

/// Debater backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiDebater {
    endpoint: EndpointConfig,
    topic: String,
    position: Position,
    client: reqwest::Client,
}

impl OpenAiDebater {
    pub fn new(endpoint: EndpointConfig, topic: &str, position: Position) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unavailable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            endpoint,
            topic: topic.to_string(),
            position,
            client,
        })
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are a skilled debater arguing the {} side of the motion: \"{}\". \
             Argue persuasively, engage directly with your opponent's points, and cite sources where you can.",
            self.position, self.topic
        )
    }

    /// System prompt, prior statements as labelled turns, then the turn prompt.
    fn messages(&self, prompt: &str, context: &GenerationContext) -> Vec<Value> {
        let mut messages = vec![json!({"role": "system", "content": self.system_prompt()})];
        for prior in &context.previous_statements {
            let label = if prior.position == self.position {
                "You"
            } else {
                "Opponent"
            };
            let role = if prior.position == self.position {
                "assistant"
            } else {
                "user"
            };
            messages.push(json!({
                "role": role,
                "content": format!("[{} - {}]\n{}", label, prior.round_type.title(), prior.content),
            }));
        }
        messages.push(json!({"role": "user", "content": prompt}));
        messages
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DebaterBackend for OpenAiDebater {
    fn model_name(&self) -> String {
        self.endpoint.model.clone()
    }

    async fn generate_response(
        &self,
        prompt: &str,
        context: &GenerationContext,
    ) -> Result<String, GenerationError> {
        let start = std::time::Instant::now();
        let request_body = json!({
            "model": self.endpoint.model,
            "messages": self.messages(prompt, context),
            "max_tokens": self.endpoint.max_tokens,
            "temperature": self.endpoint.temperature,
        });

        let mut request = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .json(&request_body);
        if let Some(ref key) = self.endpoint.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                GenerationError::Unavailable(e.to_string())
            } else {
                GenerationError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("{} API error ({}): {}", self.endpoint.model, status, body);
            return Err(if status.as_u16() == 429 || status.is_server_error() {
                GenerationError::Unavailable(message)
            } else {
                GenerationError::RequestFailed(message)
            });
        }

        let resp_json: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::ParseError(e.to_string()))?;

        let content = extract_content(&resp_json)?;
        debug!(
            model = %self.endpoint.model,
            position = %self.position,
            round = %context.round_type,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "completion received"
        );
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
fn extract_content(resp: &Value) -> Result<String, GenerationError> {
    let content = resp["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| GenerationError::ParseError("missing choices[0].message.content".into()))?;
    if content.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(content.trim().to_string())
}

/// Offline debater that replays queued replies per round, falling back to
/// canned text.
pub struct ScriptedDebater {
    name: String,
    replies: Mutex<HashMap<RoundType, VecDeque<String>>>,
    failures: HashSet<RoundType>,
}

impl ScriptedDebater {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(HashMap::new()),
            failures: HashSet::new(),
        }
    }

    /// Queue a reply for the next call in `round`. Cross-examination takes
    /// two calls per side.
    pub fn with_reply(self, round: RoundType, text: impl Into<String>) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.entry(round).or_default().push_back(text.into());
        }
        self
    }

    /// Fail every call made during `round`.
    pub fn failing_on(mut self, round: RoundType) -> Self {
        self.failures.insert(round);
        self
    }

    fn canned(&self, context: &GenerationContext) -> String {
        let side = match context.position {
            Position::Affirmative => "Affirmative",
            Position::Negative => "Negative",
        };
        format!(
            "{} {} from {}, answering {} prior statements.",
            side,
            context.round_type.title().to_lowercase(),
            self.name,
            context.previous_statements.len()
        )
    }
}

#[async_trait]
impl DebaterBackend for ScriptedDebater {
    fn model_name(&self) -> String {
        self.name.clone()
    }

    async fn generate_response(
        &self,
        _prompt: &str,
        context: &GenerationContext,
    ) -> Result<String, GenerationError> {
        if self.failures.contains(&context.round_type) {
            return Err(GenerationError::Unavailable(format!(
                "{} scripted to fail during {}",
                self.name, context.round_type
            )));
        }

        let queued = self
            .replies
            .lock()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?
            .get_mut(&context.round_type)
            .and_then(|q| q.pop_front());
        Ok(queued.unwrap_or_else(|| self.canned(context)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coordination::debate::PriorStatement;

    fn context(position: Position, round: RoundType) -> GenerationContext {
        GenerationContext::empty(position, round)
    }

    #[test]
    fn test_extract_content() {
        let resp = json!({"choices": [{"message": {"content": "  Cars must go.  "}}]});
        assert_eq!(extract_content(&resp).unwrap(), "Cars must go.");
    }

    #[test]
    fn test_extract_content_missing_or_empty() {
        assert!(matches!(
            extract_content(&json!({"choices": []})),
            Err(GenerationError::ParseError(_))
        ));
        let empty = json!({"choices": [{"message": {"content": "   "}}]});
        assert_eq!(extract_content(&empty), Err(GenerationError::EmptyResponse));
    }

    #[test]
    fn test_messages_label_prior_statements() {
        let debater = OpenAiDebater::new(EndpointConfig::default(), "Ban cars", Position::Affirmative).unwrap();
        let mut ctx = context(Position::Affirmative, RoundType::Closing);
        ctx.previous_statements = vec![
            PriorStatement {
                position: Position::Affirmative,
                content: "mine".into(),
                round_type: RoundType::Opening,
            },
            PriorStatement {
                position: Position::Negative,
                content: "theirs".into(),
                round_type: RoundType::Opening,
            },
        ];

        let messages = debater.messages("Give your closing.", &ctx);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"].as_str().unwrap().contains("Ban cars"));
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["role"], "user");
        assert!(messages[2]["content"]
            .as_str()
            .unwrap()
            .starts_with("[Opponent - Opening Statements]"));
        assert_eq!(messages[3]["content"], "Give your closing.");
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let endpoint = EndpointConfig {
            url: "http://host:8080/v1/".into(),
            ..Default::default()
        };
        let debater = OpenAiDebater::new(endpoint, "t", Position::Negative).unwrap();
        assert_eq!(debater.completions_url(), "http://host:8080/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_scripted_queue_then_canned() {
        let debater = ScriptedDebater::new("script").with_reply(RoundType::Opening, "first");
        let ctx = context(Position::Negative, RoundType::Opening);
        assert_eq!(debater.generate_response("", &ctx).await.unwrap(), "first");
        let fallback = debater.generate_response("", &ctx).await.unwrap();
        assert!(fallback.starts_with("Negative opening statements from script"));
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let debater = ScriptedDebater::new("script").failing_on(RoundType::Rebuttal);
        let err = debater
            .generate_response("", &context(Position::Affirmative, RoundType::Rebuttal))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Unavailable(_)));
    }
}
