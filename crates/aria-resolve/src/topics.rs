//! Topic redirection.
//!
//! A weighted term-frequency pass over the retrieved chunks. When the
//! dominant term also appears in the question, the answer becomes a short
//! definition plus a menu of related subtopics instead of a full answer.

use std::collections::{HashMap, HashSet};

use aria_core::Chunk;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "from", "are", "was", "were", "has", "had",
    "have", "our", "your", "their", "its", "but", "not", "you", "we", "they", "she", "him",
    "her", "his", "can", "may", "will", "shall", "could", "would", "should", "a", "an", "in",
    "of", "on", "at", "to", "is", "as", "by", "it", "or", "be", "us", "about", "more", "into",
    "also", "what", "how", "why", "when", "where", "which", "who", "does", "do", "did", "tell",
    "me", "i", "am", "my", "get", "give", "know", "need", "want", "like", "use", "service",
    "services", "company", "companies", "business", "businesses", "technology", "technologies",
];

/// Labels used to fill the subtopic menu up to `SUBTOPIC_COUNT`.
const PADDING_LABELS: &[&str] = &["Services", "Solutions", "Implementation", "Support", "Strategy"];

pub const SUBTOPIC_COUNT: usize = 5;
const RANKED_LIMIT: usize = 10;
const MIN_TERM_LEN: usize = 3;
const QUESTION_BOOST: usize = 3;

/// Outcome of the frequency pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicAnalysis {
    /// Non-stop question tokens, in order, duplicates kept.
    pub question_words: Vec<String>,
    /// Up to ten `(term, score)` pairs, best first.
    pub ranked: Vec<(String, usize)>,
    pub main_topic: Option<String>,
    /// Whether the main topic relates to the question.
    pub triggered: bool,
}

impl TopicAnalysis {
    /// Exactly five `"<MAIN> <Term>"` labels. Empty when nothing triggered.
    pub fn subtopics(&self) -> Vec<String> {
        let Some(main) = self.main_topic.as_deref() else {
            return Vec::new();
        };
        let upper = main.to_uppercase();

        let mut labels: Vec<String> = self
            .ranked
            .iter()
            .map(|(term, _)| term.as_str())
            .filter(|term| *term != main && term.chars().count() >= MIN_TERM_LEN)
            .take(SUBTOPIC_COUNT)
            .map(|term| format!("{} {}", upper, capitalize(term)))
            .collect();

        for pad in PADDING_LABELS {
            if labels.len() >= SUBTOPIC_COUNT {
                break;
            }
            let label = format!("{} {}", upper, pad);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

/// Detects a dominant topic shared by the question and retrieved chunks.
#[derive(Debug, Clone)]
pub struct TopicRedirector {
    stop_words: HashSet<String>,
}

impl TopicRedirector {
    /// Stop-words are the fixed list plus the tokens of the organization name.
    pub fn new(organization: &str) -> Self {
        let mut stop_words: HashSet<String> = STOP_WORDS.iter().map(|w| w.to_string()).collect();
        stop_words.extend(tokenize(&organization.to_lowercase()).map(str::to_string));
        Self { stop_words }
    }

    fn is_candidate(&self, word: &str) -> bool {
        word.chars().count() >= MIN_TERM_LEN && !self.stop_words.contains(word)
    }

    pub fn analyze(&self, question: &str, chunks: &[Chunk]) -> TopicAnalysis {
        let lowered_question = question.to_lowercase();
        let question_words: Vec<String> = tokenize(&lowered_question)
            .filter(|w| self.is_candidate(w))
            .map(str::to_string)
            .collect();

        // Term frequencies across the chunks, kept in first-seen order.
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for chunk in chunks {
            let lowered = chunk.text.to_lowercase();
            for word in tokenize(&lowered).filter(|w| self.is_candidate(w)) {
                match counts.get_mut(word) {
                    Some(count) => *count += 1,
                    None => {
                        order.push(word.to_string());
                        counts.insert(word.to_string(), 1);
                    }
                }
            }
        }

        // A question word's whole-word count equals its chunk frequency.
        let boosted: HashSet<&str> = question_words.iter().map(String::as_str).collect();
        let mut ranked: Vec<(String, usize)> = order
            .into_iter()
            .map(|word| {
                let count = counts[&word];
                let score = if boosted.contains(word.as_str()) {
                    count + count * QUESTION_BOOST
                } else {
                    count
                };
                (word, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(RANKED_LIMIT);

        let main_topic = ranked.first().map(|(term, _)| term.clone());
        let triggered = main_topic.as_deref().is_some_and(|main| {
            question_words.iter().any(|w| w == main) || lowered_question.contains(main)
        });

        TopicAnalysis {
            question_words,
            ranked,
            main_topic,
            triggered,
        }
    }
}

/// Prompt for the one-line definition of a topic.
pub fn definition_prompt(topic: &str) -> String {
    format!(
        "Give a short one-line definition for \"{}\" in under 20 words. No extra text, just the definition.",
        topic
    )
}

pub fn format_redirect(definition: &str, main_topic: &str, subtopics: &[String], organization: &str) -> String {
    format!(
        "{}\n{} is one of {}'s key focus areas. Would you like to explore more about:\n{}?",
        definition.trim(),
        main_topic.to_uppercase(),
        organization,
        subtopics.join(", ")
    )
}

/// Split on anything that is not a word character.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_chunks() -> Vec<Chunk> {
        vec![
            Chunk::new(
                "Cloud migration moves workloads to the cloud. Our cloud practice covers hybrid cloud design.",
                "cloud.txt",
            ),
            Chunk::new(
                "Security audits protect networks. Security teams monitor threats.",
                "security.txt",
            ),
        ]
    }

    #[test]
    fn test_cloud_question_triggers() {
        let redirector = TopicRedirector::new("Tekisho Infotech");
        let analysis = redirector.analyze("What is cloud?", &cloud_chunks());

        assert_eq!(analysis.question_words, vec!["cloud"]);
        assert_eq!(analysis.main_topic.as_deref(), Some("cloud"));
        assert_eq!(analysis.ranked[0], ("cloud".to_string(), 16));
        assert_eq!(analysis.ranked[1], ("security".to_string(), 2));
        assert!(analysis.triggered);

        let subtopics = analysis.subtopics();
        assert_eq!(
            subtopics,
            vec![
                "CLOUD Security",
                "CLOUD Migration",
                "CLOUD Moves",
                "CLOUD Workloads",
                "CLOUD Practice",
            ]
        );
    }

    #[test]
    fn test_unrelated_question_does_not_trigger() {
        let redirector = TopicRedirector::new("Tekisho Infotech");
        let analysis = redirector.analyze("Who founded you?", &cloud_chunks());
        assert_eq!(analysis.main_topic.as_deref(), Some("cloud"));
        assert!(!analysis.triggered);
    }

    #[test]
    fn test_substring_match_triggers() {
        let redirector = TopicRedirector::new("Acme");
        let chunks = vec![Chunk::new("Cloud cloud cloud.", "a.txt")];
        // "cloudy" is not a question word but contains the main topic.
        let analysis = redirector.analyze("Is it cloudy?", &chunks);
        assert!(analysis.triggered);
    }

    #[test]
    fn test_no_chunks_no_topic() {
        let redirector = TopicRedirector::new("Acme");
        let analysis = redirector.analyze("What is cloud?", &[]);
        assert!(analysis.main_topic.is_none());
        assert!(!analysis.triggered);
        assert!(analysis.subtopics().is_empty());
    }

    #[test]
    fn test_padding_reaches_five() {
        let redirector = TopicRedirector::new("Acme");
        let chunks = vec![Chunk::new("Kafka streams.", "a.txt")];
        let analysis = redirector.analyze("kafka?", &chunks);
        assert_eq!(analysis.main_topic.as_deref(), Some("kafka"));
        assert_eq!(
            analysis.subtopics(),
            vec![
                "KAFKA Streams",
                "KAFKA Services",
                "KAFKA Solutions",
                "KAFKA Implementation",
                "KAFKA Support",
            ]
        );
    }

    #[test]
    fn test_padding_skips_existing_labels() {
        let redirector = TopicRedirector::new("Acme");
        let chunks = vec![Chunk::new("Kafka kafka solutions support.", "a.txt")];
        let subtopics = redirector.analyze("kafka", &chunks).subtopics();
        assert_eq!(subtopics.len(), SUBTOPIC_COUNT);
        let unique: HashSet<&String> = subtopics.iter().collect();
        assert_eq!(unique.len(), SUBTOPIC_COUNT);
    }

    #[test]
    fn test_organization_tokens_are_stop_words() {
        let redirector = TopicRedirector::new("Acme Robotics");
        let chunks = vec![Chunk::new("Acme Robotics Acme Robotics builds arms.", "a.txt")];
        let analysis = redirector.analyze("What does Acme build?", &chunks);
        assert!(analysis.ranked.iter().all(|(t, _)| t != "acme" && t != "robotics"));
    }

    #[test]
    fn test_redirect_format() {
        let labels: Vec<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
        let text = format_redirect("Storage over the network. ", "cloud", &labels, "Acme");
        assert_eq!(
            text,
            "Storage over the network.\nCLOUD is one of Acme's key focus areas. Would you like to explore more about:\nA, B?"
        );
    }

    #[test]
    fn test_definition_prompt_quotes_topic() {
        assert!(definition_prompt("cloud").contains("\"cloud\""));
    }
}
