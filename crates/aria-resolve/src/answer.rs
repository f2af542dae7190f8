//! Grounded answer prompts and output cleaning.

use once_cell::sync::Lazy;
use regex::Regex;

use aria_core::{Chunk, Persona};

/// Reply the model must give when the context has nothing relevant.
pub const SENTINEL: &str = "FALLBACK";

pub const PRIMARY_TEMPERATURE: f64 = 0.1;
pub const PRIMARY_MAX_TOKENS: usize = 250;
pub const FALLBACK_TEMPERATURE: f64 = 0.4;
pub const DEFINITION_TEMPERATURE: f64 = 0.2;
pub const EXTRACTION_TEMPERATURE: f64 = 0.0;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[a-zA-Z]*").unwrap());
static SENTINEL_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\bFALLBACK\b.*").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Retrieved chunks as `"<source>:\n<text>"` blocks separated by blank lines.
pub fn build_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| format!("{}:\n{}", c.source, c.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn grounded_prompt(persona: &Persona, context: &str, question: &str) -> String {
    format!(
        "You are {name}, {org}'s AI assistant.\n\
         Answer using only the context below.\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\n\
         Instructions:\n\
         - Answer in 2-4 clear sentences.\n\
         - Use plain text only. No markdown, bullet points or numbered lists.\n\
         - Do not repeat the question.\n\
         - Never mention the word {sentinel} in a normal answer.\n\
         - If no relevant info exists, respond with exactly: {sentinel}",
        name = persona.assistant_name,
        org = persona.organization,
        context = context,
        question = question,
        sentinel = SENTINEL,
    )
}

/// Context-free prompt for the stronger model.
pub fn fallback_prompt(persona: &Persona, question: &str) -> String {
    format!(
        "You are {}, {}'s assistant. Please answer briefly and clearly: \"{}\"",
        persona.assistant_name, persona.organization, question
    )
}

/// Strip formatting and everything from the sentinel onward.
pub fn clean_answer(raw: &str) -> String {
    let text = CODE_FENCE.replace_all(raw, "");
    let text = text.replace("**", "").replace('*', "");
    let text = SENTINEL_TAIL.replace(&text, "");
    MULTI_SPACE.replace_all(&text, " ").trim().to_string()
}

/// Whether a cleaned answer must be escalated to the fallback tier.
pub fn needs_fallback(cleaned: &str) -> bool {
    let trimmed = cleaned.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_layout() {
        let chunks = vec![Chunk::new("Alpha.", "a.txt"), Chunk::new("Beta.", "b.txt")];
        assert_eq!(build_context(&chunks), "a.txt:\nAlpha.\n\nb.txt:\nBeta.");
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_clean_strips_markdown() {
        assert_eq!(
            clean_answer("**Cloud**  is\n\n*fast*."),
            "Cloud is fast."
        );
        assert_eq!(clean_answer("```text\nhello\n```"), "hello");
    }

    #[test]
    fn test_clean_drops_sentinel_and_tail() {
        assert_eq!(clean_answer("FALLBACK"), "");
        assert_eq!(clean_answer("fallback."), "");
        assert_eq!(
            clean_answer("We offer SAP consulting. FALLBACK\nignore this"),
            "We offer SAP consulting."
        );
        // Only the whole word counts.
        assert_eq!(clean_answer("FALLBACKS happen"), "FALLBACKS happen");
    }

    #[test]
    fn test_needs_fallback() {
        assert!(needs_fallback(""));
        assert!(needs_fallback("  "));
        assert!(needs_fallback("Fallback"));
        assert!(!needs_fallback("We build chatbots."));
    }

    #[test]
    fn test_prompts_carry_persona() {
        let persona = Persona::default();
        let grounded = grounded_prompt(&persona, "ctx", "What is SAP?");
        assert!(grounded.contains("You are Aria, Tekisho Infotech's AI assistant."));
        assert!(grounded.contains("Question: What is SAP?"));
        assert!(grounded.ends_with("respond with exactly: FALLBACK"));

        let fallback = fallback_prompt(&persona, "What is SAP?");
        assert_eq!(
            fallback,
            "You are Aria, Tekisho Infotech's assistant. Please answer briefly and clearly: \"What is SAP?\""
        );
    }
}
