//! Diagnosis prompts for the chat-completion fallback.
//!
//! The model is asked for a single JSON object with a fixed schema. Replies
//! are still parsed leniently (see [`crate::extraction`]) because models wrap
//! JSON in prose or markdown fences regardless of instructions.

use crate::client::ChatMessage;

/// System prompt for the diagnosis assistant.
pub const SYSTEM_PROMPT: &str = "You are a medical assistant. Respond ONLY in valid JSON.";

/// JSON skeleton the model is asked to fill in.
pub const RESPONSE_SCHEMA: &str = r#"{
  "disease": "",
  "explanation": "",
  "medications": [],
  "precautions": [],
  "diet": [],
  "workout": []
}"#;

/// User prompt template for a symptom description.
pub fn make_diagnosis_prompt(symptoms: &str) -> String {
    format!(
        r#"User symptoms: {}

Respond ONLY in this JSON format:

{}

Do not add markdown.
Do not add text outside JSON.
Return only JSON."#,
        symptoms.trim(),
        RESPONSE_SCHEMA
    )
}

/// Build the system + user message pair sent to the chat endpoint.
pub fn build_chat_messages(symptoms: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(make_diagnosis_prompt(symptoms)),
    ]
}
