//! Contact capture: decide whether to ask for details or extract them.
//!
//! The step is derived from the message alone. A user who sends their name
//! in one message and their phone in the next is asked again; every
//! qualifying message must carry all three details.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use aria_store::ContactRecord;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{7,}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStep {
    /// Contact intent without an email or phone number: ask for details.
    NeedData,
    /// Email and phone number present: run extraction.
    DataPresent,
    /// Nothing contact-related to do.
    NotApplicable,
}

pub fn contact_step(message: &str, contact_intent: bool) -> ContactStep {
    let has_at = message.contains('@');
    let has_digits = DIGIT_RUN.is_match(message);

    if contact_intent && !has_at && !has_digits {
        ContactStep::NeedData
    } else if has_at && has_digits {
        ContactStep::DataPresent
    } else {
        ContactStep::NotApplicable
    }
}

/// Few-shot prompt asking for `{name, phone, email}` as a JSON object.
pub fn extraction_prompt(message: &str) -> String {
    format!(
        r#"You are a strict data extractor. Extract the following fields from the given message and return them as JSON.

Examples:
Input: "m.divya,9987654321,divya123@gmail.com"
Output: {{"name": "m.divya", "phone": "9987654321", "email": "divya123@gmail.com"}}

Input: "My name is John Doe, you can call me at 9876543210 or email me at john@gmail.com"
Output: {{"name": "John Doe", "phone": "9876543210", "email": "john@gmail.com"}}

Text: "{}"
If any field is missing, leave it as an empty string. Return the result as a JSON object."#,
        message
    )
}

/// Parse the extractor's reply. Anything unusable becomes empty fields.
pub fn parse_extraction(raw: &str) -> ContactRecord {
    let empty = ContactRecord {
        name: String::new(),
        phone: String::new(),
        email: String::new(),
    };

    let raw = strip_code_fence(raw.trim());
    if raw.is_empty() {
        warn!("Empty response for contact extraction");
        return empty;
    }

    let parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("Malformed contact extraction response: {}", e);
            return empty;
        }
    };
    if !parsed.is_object() {
        warn!("Contact extraction response is not an object");
        return empty;
    }

    ContactRecord {
        name: field(&parsed, "name"),
        phone: field(&parsed, "phone"),
        email: field(&parsed, "email"),
    }
}

fn field(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn strip_code_fence(raw: &str) -> &str {
    raw.strip_prefix("```json")
        .or_else(|| raw.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(raw)
}
