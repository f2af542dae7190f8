//! Intent classification with fixed regex and keyword checks.

use once_cell::sync::Lazy;
use regex::Regex;

/// What a message is asking for, before any retrieval happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Salutation, or the assistant addressed by name.
    Greeting,
    /// Off-domain topic the assistant declines.
    Irrelevant,
    /// Wants to be contacted or to connect with the team.
    ContactIntent,
    None,
}

/// Off-domain keywords, matched as substrings of the lowercased message.
pub const IRRELEVANT_KEYWORDS: &[&str] = &[
    "movie", "actor", "song", "sports", "joke", "weather", "travel", "politics",
];

static GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(hi|hello|hey|hiya|howdy)\b").unwrap());
static CONTACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)contact|connect|reach|talk|speak|call|email|get in touch|join").unwrap()
});

/// Stateless classifier. Checks run in priority order: greeting, irrelevant,
/// contact intent.
pub struct IntentClassifier {
    name_re: Option<Regex>,
}

impl IntentClassifier {
    pub fn new(assistant_name: &str) -> Self {
        let name = assistant_name.trim().to_lowercase();
        let name_re = if name.is_empty() {
            None
        } else {
            Regex::new(&format!(r"\b{}\b", regex::escape(&name))).ok()
        };
        Self { name_re }
    }

    pub fn classify(&self, message: &str) -> Intent {
        if self.is_greeting(message) {
            Intent::Greeting
        } else if is_irrelevant(message) {
            Intent::Irrelevant
        } else if has_contact_intent(message) {
            Intent::ContactIntent
        } else {
            Intent::None
        }
    }

    pub fn is_greeting(&self, message: &str) -> bool {
        let lower = message.to_lowercase();
        GREETING_RE.is_match(&lower)
            || self.name_re.as_ref().is_some_and(|re| re.is_match(&lower))
    }
}

pub fn is_irrelevant(message: &str) -> bool {
    let lower = message.to_lowercase();
    IRRELEVANT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

pub fn has_contact_intent(message: &str) -> bool {
    CONTACT_RE.is_match(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new("Aria")
    }

    #[test]
    fn test_greetings() {
        let c = classifier();
        assert_eq!(c.classify("Hello there"), Intent::Greeting);
        assert_eq!(c.classify("hey"), Intent::Greeting);
        assert_eq!(c.classify("Who built you, Aria?"), Intent::Greeting);
        // Salutation must lead the message and be a whole word.
        assert_ne!(c.classify("Say hi to the team"), Intent::Greeting);
        assert_ne!(c.classify("History of the company"), Intent::Greeting);
        assert_ne!(c.classify("Tell me about ariadne"), Intent::Greeting);
    }

    #[test]
    fn test_greeting_beats_irrelevant() {
        assert_eq!(
            classifier().classify("hey, any good movie tips?"),
            Intent::Greeting
        );
    }

    #[test]
    fn test_irrelevant_beats_contact() {
        assert_eq!(
            classifier().classify("Can you email me the weather?"),
            Intent::Irrelevant
        );
    }

    #[test]
    fn test_contact_intent() {
        let c = classifier();
        assert_eq!(c.classify("can you connect me"), Intent::ContactIntent);
        assert_eq!(c.classify("I want to GET IN TOUCH"), Intent::ContactIntent);
        assert_eq!(c.classify("How do I join your team?"), Intent::ContactIntent);
    }

    #[test]
    fn test_no_intent() {
        assert_eq!(classifier().classify("What is cloud migration?"), Intent::None);
    }

    #[test]
    fn test_blank_name_never_matches() {
        let c = IntentClassifier::new("  ");
        assert_eq!(c.classify("What do you offer?"), Intent::None);
    }
}
