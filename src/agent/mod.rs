pub mod gemini;
pub mod runner;
pub mod tools;
pub mod types;

pub use gemini::GeminiClient;
pub use runner::DiscoveryRunner;
pub use tools::{tool_definitions, DiscoveryTools};
pub use types::{ChatMessage, LLMResponse, ToolCallRequest};
