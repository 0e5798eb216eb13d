// ABOUTME: OpenAI-compatible chat completions wire format.
// ABOUTME: Shared by every provider that speaks the /chat/completions dialect.

use serde::{Deserialize, Serialize};

use super::{Message, Request, Response, StopReason, Usage};

/// Chat completions request body.
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Chat message on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completions response body.
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<OpenAIChoice>,
    pub usage: Option<OpenAIUsage>,
}

/// One response choice.
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    #[serde(default)]
    pub index: usize,
    pub message: OpenAIMessage,
    pub finish_reason: Option<String>,
}

/// Usage stats.
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Error response body.
#[derive(Debug, Deserialize)]
pub struct OpenAIError {
    pub error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIErrorDetail {
    pub message: String,
}

impl From<&Message> for OpenAIMessage {
    fn from(msg: &Message) -> Self {
        OpenAIMessage {
            role: msg.role.as_str().to_string(),
            content: Some(msg.content.clone()),
        }
    }
}

impl From<&Request> for OpenAIRequest {
    fn from(req: &Request) -> Self {
        OpenAIRequest {
            model: req.model.clone(),
            messages: req.messages.iter().map(OpenAIMessage::from).collect(),
            max_tokens: req.max_tokens,
            temperature: req.temperature,
        }
    }
}

fn parse_stop_reason(s: Option<&str>) -> StopReason {
    match s {
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}

impl OpenAIResponse {
    /// Convert the first choice into a `Response`; `None` when there are no choices.
    pub fn into_response(self) -> Option<Response> {
        let choice = self.choices.into_iter().next()?;
        let usage = self.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Some(Response {
            id: self.id,
            content: choice.message.content.unwrap_or_default(),
            stop_reason: parse_stop_reason(choice.finish_reason.as_deref()),
            model: self.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_conversion_keeps_roles_in_order() {
        let req = Request::new("deepseek/deepseek-chat")
            .message(Message::system("You output JSON plans."))
            .message(Message::user("plan this"))
            .max_tokens(512);

        let wire = OpenAIRequest::from(&req);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["model"], "deepseek/deepseek-chat");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "plan this");
        assert_eq!(json["max_tokens"], 512);
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let json = r#"{
            "id": "gen-1",
            "model": "deepseek/deepseek-chat",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "hello"},
                "finish_reason": "length"
            }],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3, "total_tokens": 10}
        }"#;
        let resp: OpenAIResponse = serde_json::from_str(json).unwrap();
        let resp = resp.into_response().unwrap();

        assert_eq!(resp.content, "hello");
        assert_eq!(resp.stop_reason, StopReason::MaxTokens);
        assert_eq!(resp.usage.input_tokens, 7);
        assert_eq!(resp.usage.output_tokens, 3);
    }

    #[test]
    fn test_response_without_choices() {
        let resp: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(resp.into_response().is_none());
    }
}
