//! # GenBOQ LLM SDK
//!
//! A small LLM SDK used by GenBOQ to talk to Google Gemini with structured JSON output.
//!
//! ## Example
//!
//! ```rust,no_run
//! use genboq_llm_sdk::gemini::GeminiClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new("your-gemini-api-key")?;
//!     let response = client
//!         .message_builder()
//!         .model("gemini-2.5-pro")
//!         .system("Answer with a JSON object.")
//!         .user_message("List two colours.")
//!         .response_json_schema(json!({
//!             "type": "object",
//!             "properties": { "colours": { "type": "array", "items": { "type": "string" } } },
//!             "required": ["colours"]
//!         }))
//!         .send()
//!         .await?;
//!
//!     println!("Response: {}", response.text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod gemini;
pub mod models;
pub mod types;
