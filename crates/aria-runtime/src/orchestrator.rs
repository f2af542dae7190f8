//! The assistant: one call per question, returning a tagged answer.

use std::sync::Arc;

use tracing::{debug, error, info};

use aria_chat::{AnswerSource, AskResponse, CompletionRequest, GenerationProvider, HealthResponse, ModelTier};
use aria_core::{AriaConfig, Chunk, Error, Persona, Result};
use aria_infer::EmbeddingProvider;
use aria_resolve::answer::{
    build_context, clean_answer, fallback_prompt, grounded_prompt, needs_fallback,
    DEFINITION_TEMPERATURE, EXTRACTION_TEMPERATURE, FALLBACK_TEMPERATURE, PRIMARY_MAX_TOKENS,
    PRIMARY_TEMPERATURE,
};
use aria_resolve::contact::extraction_prompt;
use aria_resolve::topics::{definition_prompt, format_redirect};
use aria_resolve::{
    contact_step, parse_extraction, replies, ContactStep, Intent, IntentClassifier, QueryExpansion,
    Retriever, TopicRedirector,
};
use aria_store::{ContactRecord, Index, SubmissionStore};

use crate::knowledge::KnowledgeBase;

/// Answers questions against a fixed knowledge base.
pub struct Assistant {
    persona: Persona,
    classifier: IntentClassifier,
    redirector: TopicRedirector,
    retriever: Retriever,
    top_k: usize,
    knowledge: Arc<KnowledgeBase>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    store: Arc<dyn SubmissionStore>,
}

impl Assistant {
    pub fn new(
        config: &AriaConfig,
        knowledge: Arc<KnowledgeBase>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        store: Arc<dyn SubmissionStore>,
    ) -> Self {
        let persona = config.persona.clone();
        Self {
            classifier: IntentClassifier::new(&persona.assistant_name),
            redirector: TopicRedirector::new(&persona.organization),
            retriever: Retriever::new(
                QueryExpansion::for_organization(&persona.organization),
                config.retrieval.similarity_threshold,
            ),
            top_k: config.retrieval.top_k,
            persona,
            knowledge,
            embedder,
            generator,
            store,
        }
    }

    /// Answer a question. Failures become `error` or `system` answers.
    pub async fn ask(&self, question: &str) -> AskResponse {
        let question = question.trim();
        match self.resolve(question).await {
            Ok(response) => {
                debug!("Answered with source {:?}", response.source);
                response
            }
            Err(Error::NotReady) => AskResponse::new(replies::NOT_READY, AnswerSource::System),
            Err(Error::Extraction(e)) => {
                info!("Contact details not captured: {}", e);
                AskResponse::new(replies::CONTACT_RETRY, AnswerSource::ContactRetry)
            }
            Err(Error::Persistence(e)) => {
                error!("Failed to save contact: {}", e);
                AskResponse::new(replies::CONTACT_SAVE_FAILED, AnswerSource::Error)
            }
            Err(e) => {
                error!("Failed to answer question: {}", e);
                AskResponse::new(replies::INTERNAL_ERROR, AnswerSource::Error)
            }
        }
    }

    async fn resolve(&self, question: &str) -> Result<AskResponse> {
        let intent = self.classifier.classify(question);
        match intent {
            Intent::Greeting => {
                return Ok(AskResponse::new(replies::greeting(&self.persona), AnswerSource::Greeting))
            }
            Intent::Irrelevant => {
                return Ok(AskResponse::new(
                    replies::restricted(&self.persona),
                    AnswerSource::Restricted,
                ))
            }
            Intent::ContactIntent | Intent::None => {}
        }

        let index = self.knowledge.index().ok_or(Error::NotReady)?;

        match contact_step(question, intent == Intent::ContactIntent) {
            ContactStep::NeedData => {
                return Ok(AskResponse::new(replies::CONTACT_REQUEST, AnswerSource::ContactRequest))
            }
            ContactStep::DataPresent => return self.capture_contact(question).await,
            ContactStep::NotApplicable => {}
        }

        self.answer_from_index(index, question).await
    }

    async fn capture_contact(&self, message: &str) -> Result<AskResponse> {
        let record = self.extract_contact(message).await?;

        let id = self.store.insert_contact(&record).map_err(|e| match e {
            e @ Error::Persistence(_) => e,
            other => Error::Persistence(other.to_string()),
        })?;
        info!("Saved contact {} (id={})", record.email, id);

        Ok(AskResponse::new(
            replies::contact_confirmation(&record.name, &record.email),
            AnswerSource::ContactConfirmation,
        ))
    }

    /// Ask the primary model for `{name, phone, email}`; all three must come back.
    async fn extract_contact(&self, message: &str) -> Result<ContactRecord> {
        let request = CompletionRequest::new(
            extraction_prompt(message),
            ModelTier::Primary,
            EXTRACTION_TEMPERATURE,
        )
        .json();

        let raw = self
            .generator
            .complete(&request)
            .await
            .map_err(|e| Error::Extraction(format!("extractor unavailable: {}", e)))?;
        let record = parse_extraction(&raw);
        if !record.is_complete() {
            return Err(Error::Extraction("missing name, phone or email".into()));
        }
        Ok(record)
    }

    async fn answer_from_index(&self, index: &Index, question: &str) -> Result<AskResponse> {
        let chunks = self
            .retriever
            .retrieve(index, self.embedder.as_ref(), question, self.top_k)
            .await?;

        if !chunks.is_empty() {
            if let Some(response) = self.topic_redirect(question, &chunks).await? {
                return Ok(response);
            }
        }

        self.compose(question, &chunks).await
    }

    async fn topic_redirect(&self, question: &str, chunks: &[Chunk]) -> Result<Option<AskResponse>> {
        let analysis = self.redirector.analyze(question, chunks);
        debug!(
            "Topic analysis: question_words={:?}, main_topic={:?}, triggered={}",
            analysis.question_words, analysis.main_topic, analysis.triggered
        );
        let Some(main) = analysis.main_topic.as_deref().filter(|_| analysis.triggered) else {
            return Ok(None);
        };

        info!("Topic redirection for '{}'", main);
        let request = CompletionRequest::new(
            definition_prompt(main),
            ModelTier::Primary,
            DEFINITION_TEMPERATURE,
        );
        let definition = self.generator.complete(&request).await?;

        Ok(Some(AskResponse::new(
            format_redirect(
                &definition,
                main,
                &analysis.subtopics(),
                &self.persona.organization,
            ),
            AnswerSource::TopicRedirect,
        )))
    }

    async fn compose(&self, question: &str, chunks: &[Chunk]) -> Result<AskResponse> {
        let context = build_context(chunks);
        let request = CompletionRequest::new(
            grounded_prompt(&self.persona, &context, question),
            ModelTier::Primary,
            PRIMARY_TEMPERATURE,
        )
        .max_tokens(PRIMARY_MAX_TOKENS);

        let answer = clean_answer(&self.generator.complete(&request).await?);
        if !needs_fallback(&answer) {
            return Ok(AskResponse::new(answer, AnswerSource::KnowledgeBase));
        }

        info!("No grounded answer; escalating to fallback model");
        let request = CompletionRequest::new(
            fallback_prompt(&self.persona, question),
            ModelTier::Fallback,
            FALLBACK_TEMPERATURE,
        );
        let answer = clean_answer(&self.generator.complete(&request).await?);
        let answer = if answer.is_empty() {
            replies::NO_ANSWER.to_string()
        } else {
            answer
        };
        Ok(AskResponse::new(answer, AnswerSource::Fallback))
    }

    /// Store a feedback message. Blank messages are rejected.
    pub fn submit_feedback(&self, message: &str) -> Result<i64> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Validation("Feedback message required".into()));
        }
        let id = self.store.insert_feedback(message)?;
        info!("Saved feedback (id={})", id);
        Ok(id)
    }

    pub fn health(&self) -> HealthResponse {
        self.knowledge.health()
    }
}
