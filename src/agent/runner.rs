use crate::core::BrowserTrait;
use crate::errors::Result;
use tracing::{debug, info, warn};

use super::gemini::GeminiClient;
use super::tools::{tool_definitions, DiscoveryTools};
use super::types::ChatMessage;

/// Instruction given to the discovery agent.
const SYSTEM_INSTRUCTION: &str = "You are a UI Discovery Agent. Your task is to observe the current web page using the provided tools. \
1. Take a screenshot.\n\
2. Get page metadata.\n\
3. Get interactable elements.\n\
4. Finally, OUTPUT the collected information as a valid JSON object. \
Do not include markdown formatting.";

/// Drives the observe-and-report loop: model call, tool execution, repeat
/// until the model stops requesting tools or the turn cap is hit.
pub struct DiscoveryRunner<B: BrowserTrait> {
    client: GeminiClient,
    tools: DiscoveryTools<B>,
    max_turns: usize,
}

impl<B: BrowserTrait> DiscoveryRunner<B> {
    pub fn new(client: GeminiClient, tools: DiscoveryTools<B>, max_turns: usize) -> Self {
        Self {
            client,
            tools,
            max_turns,
        }
    }

    /// Run the loop to completion and return everything the model said.
    /// Text is also printed as it streams back.
    pub async fn run(&mut self, opening: &str) -> Result<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        info!(%session_id, "starting discovery run");

        let mut messages = vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(opening),
        ];
        let mut final_output = String::new();

        for turn in 0..self.max_turns {
            debug!(turn, "requesting next step");
            let response = self.client.chat(&messages, &tool_definitions()).await?;

            if let Some(text) = &response.content {
                println!("{}", text);
                final_output.push_str(text);
            }

            if response.tool_calls.is_empty() {
                break;
            }

            let mut assistant = ChatMessage::assistant(response.content.as_deref().unwrap_or(""));
            assistant.tool_calls = Some(response.tool_calls.clone());
            messages.push(assistant);

            for call in &response.tool_calls {
                debug!(tool = %call.name, "executing tool");
                let result = self.tools.dispatch(&call.name, &call.arguments).await;
                messages.push(ChatMessage::tool_result(&call.name, &result));
            }

            if turn + 1 == self.max_turns {
                warn!("turn limit reached before the agent finished");
            }
        }

        if let Err(e) = self.tools.shutdown().await {
            warn!(error = %e, "browser shutdown failed");
        }

        Ok(final_output)
    }
}
