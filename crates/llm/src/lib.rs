//! # LLM
//!
//! Text-completion provider abstraction used by the SoundMyBrand strategy
//! pipeline.
//!
//! This crate provides:
//! - The [`AIProvider`] trait that every completion backend implements
//! - A Google Gemini backend ([`GeminiProvider`])
//! - Reply helpers that strip Markdown code fences and decode JSON
//!
//! ## Example
//!
//! ```rust,ignore
//! use llm::{AIMessage, AIProvider, GeminiProvider, GenerateOptions};
//!
//! let provider = GeminiProvider::new(api_key)?;
//! let messages = vec![AIMessage::user("Describe a calm brand in three words")];
//! let reply = provider
//!     .generate_text("gemini-2.5-flash", &messages, &GenerateOptions::default())
//!     .await?;
//! ```

pub mod error;
pub mod gemini;
pub mod provider;
pub mod response;

pub use error::{LlmError, LlmResult};
pub use gemini::GeminiProvider;
pub use provider::{AIMessage, AIProvider, AIResponse, AIRole, GenerateOptions, TokenUsage};
pub use response::{parse_json_text, strip_code_fences};
