use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use secblog_ai::answer::rag_answer_prompt;
use secblog_ai::embeddings::Embedder;
use secblog_ai::ingest::{Document, SourceMeta};
use secblog_ai::llm::Llm;
use secblog_ai::pipeline::RagPipeline;
use secblog_core::config::RagSettings;
use secblog_core::error::{AppError, ErrorClass};

const RANSOMWARE: &str =
    "Ransomware encrypts victim files and demands payment for the decryption key.";
const PHISHING: &str = "Phishing emails trick users into revealing their credentials.";

const VOCAB: [&str; 5] = ["ransomware", "encrypt", "payment", "phishing", "email"];

/// Bag-of-keywords embedding over a tiny security vocabulary.
struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed(&self, _model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        let lower = input.to_lowercase();
        Ok(VOCAB
            .iter()
            .map(|w| lower.matches(w).count() as f32)
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LlmCall {
    model: String,
    prompt: String,
    temperature: Option<f32>,
}

struct RecordingLlm {
    calls: Rc<RefCell<Vec<LlmCall>>>,
    reply: Result<String, AppError>,
}

impl Llm for RecordingLlm {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        self.calls.borrow_mut().push(LlmCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            temperature,
        });
        self.reply.clone()
    }
}

fn page(source: &str, text: &str) -> Document {
    Document::new(
        text,
        SourceMeta {
            source: source.to_string(),
            page: 1,
            total_pages: 1,
        },
    )
}

fn pipeline_with(
    reply: Result<String, AppError>,
    top_k: usize,
) -> (RagPipeline, Rc<RefCell<Vec<LlmCall>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let llm = RecordingLlm {
        calls: Rc::clone(&calls),
        reply,
    };
    let settings = RagSettings {
        chunk_size: 1000,
        chunk_overlap: 200,
        top_k,
    };
    let pipeline = RagPipeline::new(
        Box::new(KeywordEmbedder),
        "embed-mock",
        Box::new(llm),
        "answer-mock",
        settings,
    )
    .expect("pipeline");
    (pipeline, calls)
}

#[test]
fn single_page_ransomware_document_end_to_end() {
    let (mut pipeline, calls) = pipeline_with(Ok("It encrypts files for ransom.".to_string()), 4);

    let summary = pipeline
        .ingest_documents(&[page("ransomware.pdf", RANSOMWARE)])
        .expect("ingest");
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.chunks, 1);
    let entry = &pipeline.index().entries()[0];
    assert_eq!(entry.chunk.content, RANSOMWARE);
    assert_eq!(entry.chunk.start_index, 0);

    let answered = pipeline.ask("What does ransomware do?").expect("ask");
    assert_eq!(answered.context.len(), 1);
    assert_eq!(answered.context[0].chunk.content, RANSOMWARE);
    assert_eq!(answered.answer, "It encrypts files for ransom.");

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        LlmCall {
            model: "answer-mock".to_string(),
            prompt: rag_answer_prompt("What does ransomware do?", RANSOMWARE),
            temperature: None,
        }
    );
}

#[test]
fn synthesis_only_sees_retrieved_context() {
    let (mut pipeline, calls) = pipeline_with(Ok("answer".to_string()), 1);
    pipeline
        .ingest_documents(&[page("ransomware.pdf", RANSOMWARE)])
        .expect("ingest ransomware");
    pipeline
        .ingest_documents(&[page("phishing.pdf", PHISHING)])
        .expect("ingest phishing");
    assert_eq!(pipeline.index().len(), 2);

    let answer = pipeline
        .answer_question("How does ransomware demand payment?")
        .expect("answer");
    assert_eq!(answer, "answer");

    let prompt = calls.borrow()[0].prompt.clone();
    assert!(prompt.contains(RANSOMWARE));
    assert!(!prompt.contains(PHISHING));
}

#[test]
fn context_block_joins_chunks_with_blank_line() {
    let (mut pipeline, calls) = pipeline_with(Ok("answer".to_string()), 2);
    pipeline
        .ingest_documents(&[page("a.pdf", RANSOMWARE), page("b.pdf", "Ransomware gangs")])
        .expect("ingest");

    let answered = pipeline.ask("ransomware").expect("ask");
    let block = answered
        .context
        .iter()
        .map(|s| s.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    assert_eq!(
        calls.borrow()[0].prompt,
        rag_answer_prompt("ransomware", &block)
    );
}

#[test]
fn empty_index_still_answers_with_empty_context() {
    let (pipeline, calls) = pipeline_with(Ok("I don't know.".to_string()), 4);
    let answered = pipeline.ask("What does ransomware do?").expect("ask");
    assert!(answered.context.is_empty());
    assert_eq!(answered.answer, "I don't know.");
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn blank_question_is_an_input_error() {
    let (pipeline, calls) = pipeline_with(Ok("unused".to_string()), 4);
    let err = pipeline.answer_question("   ").expect_err("blank");
    assert_eq!(err.code, "INPUT_QUESTION_EMPTY");
    assert_eq!(err.class(), ErrorClass::Input);
    assert!(calls.borrow().is_empty());
}

#[test]
fn model_failure_propagates_without_retry() {
    let failure = AppError::new("EXTERNAL_LLM_FAILED", "Chat completion request failed")
        .with_retryable(true);
    let (mut pipeline, calls) = pipeline_with(Err(failure.clone()), 4);
    pipeline
        .ingest_documents(&[page("ransomware.pdf", RANSOMWARE)])
        .expect("ingest");

    let err = pipeline.answer_question("What does ransomware do?").expect_err("llm down");
    assert_eq!(err, failure);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn invalid_chunk_settings_fail_construction() {
    let settings = RagSettings {
        chunk_size: 100,
        chunk_overlap: 100,
        top_k: 4,
    };
    let err = RagPipeline::new(
        Box::new(KeywordEmbedder),
        "embed-mock",
        Box::new(RecordingLlm {
            calls: Rc::new(RefCell::new(Vec::new())),
            reply: Ok(String::new()),
        }),
        "answer-mock",
        settings,
    )
    .err()
    .expect("invalid settings");
    assert_eq!(err.code, "CONFIG_CHUNKING_INVALID");
}
