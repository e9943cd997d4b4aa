//! OpenAI-compatible HTTP adapters
//!
//! Works against any endpoint speaking the OpenAI wire format: OpenAI
//! itself, Ollama's `/v1` shim, OpenRouter, vLLM, and friends.

pub mod chat;
pub mod embeddings;

pub use chat::OpenAiChatGateway;
pub use embeddings::OpenAiEmbeddingGateway;
