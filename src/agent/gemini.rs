use crate::core::AgentConfig;
use crate::errors::{Result, ScoutError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::types::{ChatMessage, LLMResponse, ToolCallRequest};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Minimal Gemini `generateContent` client with function-calling support.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: &str, config: &AgentConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: config
                .api_base
                .as_deref()
                .unwrap_or(GEMINI_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Convert the chat transcript to Gemini format.
    /// Gemini uses `role: "user"/"model"`, the system prompt as a separate
    /// instruction field, and tool results as functionResponse parts.
    fn convert_messages(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_text: Option<String> = None;
        let mut contents: Vec<Value> = Vec::new();

        for msg in messages {
            match msg.role.as_str() {
                "system" => {
                    system_text = Some(match system_text {
                        Some(existing) => format!("{}\n\n{}", existing, msg.content),
                        None => msg.content.clone(),
                    });
                }
                "assistant" => {
                    let mut parts: Vec<Value> = Vec::new();
                    if !msg.content.is_empty() {
                        parts.push(json!({"text": msg.content}));
                    }
                    if let Some(tool_calls) = &msg.tool_calls {
                        for tc in tool_calls {
                            parts.push(json!({
                                "functionCall": {
                                    "name": tc.name,
                                    "args": tc.arguments,
                                }
                            }));
                        }
                    }
                    if parts.is_empty() {
                        parts.push(json!({"text": ""}));
                    }
                    contents.push(json!({"role": "model", "parts": parts}));
                }
                "tool" => {
                    let name = msg.tool_call_id.as_deref().unwrap_or("");
                    let response_value = serde_json::from_str::<Value>(&msg.content)
                        .unwrap_or_else(|_| json!({"result": msg.content}));

                    let func_response = json!({
                        "functionResponse": {
                            "name": name,
                            "response": response_value,
                        }
                    });

                    // Merge consecutive tool results into one user turn
                    if let Some(last) = contents.last_mut() {
                        if last.get("role").and_then(|v| v.as_str()) == Some("user") {
                            if let Some(parts) =
                                last.get_mut("parts").and_then(|p| p.as_array_mut())
                            {
                                if parts.first().and_then(|v| v.get("functionResponse")).is_some()
                                {
                                    parts.push(func_response);
                                    continue;
                                }
                            }
                        }
                    }

                    contents.push(json!({"role": "user", "parts": [func_response]}));
                }
                _ => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{"text": msg.content}],
                    }));
                }
            }
        }

        (system_text, contents)
    }

    /// Wrap function declarations into Gemini's tools envelope.
    fn convert_tools(declarations: &[Value]) -> Vec<Value> {
        if declarations.is_empty() {
            vec![]
        } else {
            vec![json!({"functionDeclarations": declarations})]
        }
    }

    pub async fn chat(&self, messages: &[ChatMessage], tools: &[Value]) -> Result<LLMResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let (system_instruction, contents) = Self::convert_messages(messages);
        let gemini_tools = Self::convert_tools(tools);

        let mut request = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_tokens,
            }
        });

        if let Some(sys) = &system_instruction {
            request["systemInstruction"] = json!({"parts": [{"text": sys}]});
        }

        if !gemini_tools.is_empty() {
            request["tools"] = Value::Array(gemini_tools);
        }

        info!(
            model = %self.model,
            tools_count = tools.len(),
            messages_count = messages.len(),
            "calling Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoutError::ProviderError(format!("request failed: {}", e)))?;

        let status = response.status();
        let raw_body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(status = %status, body = %raw_body, "Gemini API error");
            return Err(ScoutError::ProviderError(format!(
                "Gemini API error {}: {}",
                status, raw_body
            )));
        }

        debug!(body_len = raw_body.len(), "Gemini raw response");

        let resp: GeminiResponse = serde_json::from_str(&raw_body).map_err(|e| {
            ScoutError::ProviderError(format!(
                "failed to parse Gemini response: {}. Body: {}",
                e,
                &raw_body[..raw_body.len().min(500)]
            ))
        })?;

        let candidate = resp
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| ScoutError::ProviderError("no candidates in response".to_string()))?;

        let mut text_parts: Vec<String> = Vec::new();
        let mut tool_calls: Vec<ToolCallRequest> = Vec::new();

        if let Some(content) = candidate.content {
            for (i, part) in content.parts.iter().enumerate() {
                if let Some(text) = &part.text {
                    if !text.is_empty() {
                        text_parts.push(text.clone());
                    }
                }
                if let Some(fc) = &part.function_call {
                    tool_calls.push(ToolCallRequest {
                        id: format!("gemini_call_{}", i),
                        name: fc.name.clone(),
                        arguments: fc
                            .args
                            .clone()
                            .unwrap_or(Value::Object(serde_json::Map::new())),
                    });
                }
            }
        }

        let content_text = if text_parts.is_empty() {
            None
        } else {
            Some(text_parts.join("\n"))
        };

        let finish_reason = match candidate.finish_reason.as_deref() {
            Some("STOP") => "stop".to_string(),
            Some("MAX_TOKENS") => "length".to_string(),
            Some(other) => other.to_lowercase(),
            None if !tool_calls.is_empty() => "tool_calls".to_string(),
            None => "stop".to_string(),
        };

        Ok(LLMResponse {
            content: content_text,
            tool_calls,
            finish_reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_become_the_system_instruction() {
        let messages = vec![
            ChatMessage::system("You are helpful"),
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there"),
        ];

        let (system, contents) = GeminiClient::convert_messages(&messages);
        assert_eq!(system, Some("You are helpful".to_string()));
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
    }

    #[test]
    fn tool_results_become_function_responses() {
        let mut assistant = ChatMessage::assistant("");
        assistant.tool_calls = Some(vec![ToolCallRequest {
            id: "gemini_call_0".to_string(),
            name: "get_page_metadata".to_string(),
            arguments: json!({}),
        }]);

        let messages = vec![
            ChatMessage::user("observe the page"),
            assistant,
            ChatMessage::tool_result(
                "get_page_metadata",
                r#"{"url":"https://example.com/","title":"Example"}"#,
            ),
        ];

        let (_system, contents) = GeminiClient::convert_messages(&messages);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[2]["role"], "user");
        let parts = contents[2]["parts"].as_array().unwrap();
        assert!(parts[0].get("functionResponse").is_some());
        assert_eq!(parts[0]["functionResponse"]["name"], "get_page_metadata");
        assert_eq!(
            parts[0]["functionResponse"]["response"]["url"],
            "https://example.com/"
        );
    }

    #[test]
    fn consecutive_tool_results_share_one_user_turn() {
        let mut assistant = ChatMessage::assistant("");
        assistant.tool_calls = Some(vec![
            ToolCallRequest {
                id: "gemini_call_0".to_string(),
                name: "take_screenshot".to_string(),
                arguments: json!({}),
            },
            ToolCallRequest {
                id: "gemini_call_1".to_string(),
                name: "get_page_metadata".to_string(),
                arguments: json!({}),
            },
        ]);

        let messages = vec![
            ChatMessage::user("go"),
            assistant,
            ChatMessage::tool_result("take_screenshot", r#"{"path":"/tmp/a.png"}"#),
            ChatMessage::tool_result("get_page_metadata", r#"{"url":"u","title":"t"}"#),
        ];

        let (_system, contents) = GeminiClient::convert_messages(&messages);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[2]["parts"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn declarations_are_wrapped_in_the_tools_envelope() {
        let declarations = crate::agent::tools::tool_definitions();
        let wrapped = GeminiClient::convert_tools(&declarations);
        assert_eq!(wrapped.len(), 1);
        let inner = wrapped[0]["functionDeclarations"].as_array().unwrap();
        assert_eq!(inner.len(), 3);

        assert!(GeminiClient::convert_tools(&[]).is_empty());
    }

    #[test]
    fn text_parts_parse() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Hello!"}
                    ],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;

        let resp: GeminiResponse = serde_json::from_str(body).unwrap();
        let candidates = resp.candidates.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].finish_reason.as_deref(), Some("STOP"));
        let parts = &candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Hello!"));
    }

    #[test]
    fn function_call_parts_parse_into_tool_calls() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"functionCall": {"name": "take_screenshot", "args": {}}}
                    ],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;

        let resp: GeminiResponse = serde_json::from_str(body).unwrap();
        let candidates = resp.candidates.unwrap();
        let parts = &candidates[0].content.as_ref().unwrap().parts;
        assert!(parts[0].function_call.is_some());
        assert_eq!(
            parts[0].function_call.as_ref().unwrap().name,
            "take_screenshot"
        );
    }
}
