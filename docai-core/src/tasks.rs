//! Task formatters
//!
//! Each task decides its output mode, the instruction text sent to the
//! vendor, and how the raw answer is cleaned up. Everything here is pure;
//! [`crate::service::AiService`] wires these functions to the router.

use crate::corpus::Document;
use crate::error::AiError;
use crate::providers::RequestPayload;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Longest raw document accepted for structured extraction, in characters
pub const EXTRACTION_INPUT_LIMIT: usize = 300_000;

/// Longest corpus context sent with a grounded chat, in characters
pub const CORPUS_CONTEXT_LIMIT: usize = 200_000;

/// Appended to the corpus context when it was cut
pub const TRUNCATION_MARKER: &str = "\n...(truncated)...";

/// Prompt used by the connection check
pub const CONNECTION_CHECK_PROMPT: &str = "Hello, reply with 'OK'.";

const PORTAL_NAME: &str = "DevCenter";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*[ \t]*\r?\n?(.*?)\s*```\s*$").expect("valid code fence pattern")
});

/// One sub-document produced by structured extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    pub title: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub content: String,
}

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => f.write_str("user"),
            ChatRole::Assistant => f.write_str("assistant"),
        }
    }
}

/// A prior turn of a grounded chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Byte index where `text` must be cut to keep `limit` characters, if it is longer
fn cut_index(text: &str, limit: usize) -> Option<usize> {
    text.char_indices().nth(limit).map(|(byte_index, _)| byte_index)
}

// --- Content suggestion ---

pub fn content_suggestion_payload(current_content: &str, instruction: &str) -> RequestPayload {
    let prompt = format!(
        "You are a technical documentation assistant.\n\
         Task: {}\n\
         Return ONLY the revised Markdown content. Do not include commentary or conversational filler.",
        instruction
    );
    RequestPayload::text(prompt).with_context(current_content)
}

pub fn clean_suggestion(raw: &str) -> String {
    raw.trim().to_string()
}

// --- Label translation ---

pub fn label_translation_payload(text: &str) -> RequestPayload {
    RequestPayload::text(format!(
        "Translate the following text to English for a technical documentation UI label.\n\
         Keep it concise and professional (Title Case).\n\
         Return ONLY the English translation. No quotes, no explanations.\n\n\
         Text: \"{}\"",
        text
    ))
}

const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

/// Trim, then drop backticks and one matching quote pair wrapped around the label
///
/// A lone quote is part of the label (`'90s Archive`, `Contributors'`).
pub fn clean_label(raw: &str) -> String {
    let mut label = raw.trim().trim_matches('`').trim();
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = label.strip_prefix(open).and_then(|rest| rest.strip_suffix(close)) {
            label = inner.trim();
            break;
        }
    }
    label.to_string()
}

// --- Structured extraction ---

pub fn document_extraction_payload(raw_document: &str) -> RequestPayload {
    let text = match cut_index(raw_document, EXTRACTION_INPUT_LIMIT) {
        Some(cut) => &raw_document[..cut],
        None => raw_document,
    };
    let prompt = "You are a technical documentation expert.\n\
                  Analyze the provided raw document text.\n\
                  1. Split the content into logical documents (Overview, Quick Start, API, etc.).\n\
                  2. Return a valid JSON array where each object has:\n   \
                  - \"title\": string\n   \
                  - \"categoryName\": string (group related docs)\n   \
                  - \"content\": string (Markdown format)\n\n\
                  Return ONLY valid JSON.";
    RequestPayload::json(prompt).with_context(format!("DOCUMENT CONTENT:\n{}", text))
}

/// Remove a Markdown code fence wrapped around the whole answer
pub fn strip_code_fences(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => raw.trim(),
    }
}

/// Parse the vendor's answer into extracted documents
///
/// Accepts a bare array, or an object wrapping exactly one array (what
/// JSON-object response modes tend to produce).
pub fn parse_extracted_documents(raw: &str) -> Result<Vec<ExtractedDocument>, AiError> {
    let malformed = |message: String| AiError::MalformedStructuredOutput {
        message,
        raw: raw.to_string(),
    };

    let value: Value = serde_json::from_str(strip_code_fences(raw)).map_err(|e| malformed(e.to_string()))?;

    let array = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter(|(_, v)| v.is_array());
            match (arrays.next(), arrays.next()) {
                (Some((_, array)), None) => array,
                _ => return Err(malformed("expected a JSON array of documents".to_string())),
            }
        }
        _ => return Err(malformed("expected a JSON array of documents".to_string())),
    };

    serde_json::from_value(array).map_err(|e| malformed(e.to_string()))
}

// --- Grounded chat ---

/// Concatenate published documents, cut to [`CORPUS_CONTEXT_LIMIT`] characters
pub fn build_corpus_context(documents: &[Document]) -> String {
    let mut context: String = documents
        .iter()
        .filter(|d| d.is_published())
        .map(|d| format!("\n---\nDOCUMENT TITLE: {}\nCONTENT:\n{}\n", d.title, d.content))
        .collect();

    if let Some(cut) = cut_index(&context, CORPUS_CONTEXT_LIMIT) {
        context.truncate(cut);
        context.push_str(TRUNCATION_MARKER);
    }
    context
}

pub fn grounded_chat_payload(
    documents: &[Document],
    history: &[ChatTurn],
    message: &str,
) -> RequestPayload {
    let history = history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n");

    RequestPayload::text(format!(
        "You are the intelligent assistant for the \"{portal}\" platform.\n\
         Your goal is to answer user questions based STRICTLY on the documentation provided in the context below.\n\n\
         Rules:\n\
         1. If the answer is found in the context, answer clearly and concisely in Markdown.\n\
         2. If the answer is NOT found in the context, politely state that the information is not available in the current documentation.\n\
         3. Be helpful and professional.\n\n\
         Documentation Context:\n{context}\n\n\
         Chat History:\n{history}\n\n\
         User Question: {message}",
        portal = PORTAL_NAME,
        context = build_corpus_context(documents),
        history = history,
        message = message,
    ))
}

// --- Connection check ---

pub fn connection_check_payload() -> RequestPayload {
    RequestPayload::text(CONNECTION_CHECK_PROMPT)
}
