use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use secblog_ai::embeddings::openai_embed::OpenAiEmbedder;
use secblog_ai::embeddings::Embedder;
use secblog_ai::llm::openai_chat::OpenAiChat;
use secblog_ai::llm::Llm;
use secblog_ai::openai::OpenAiClient;

#[derive(Debug)]
struct Recorded {
    request_line: String,
    authorization: Option<String>,
    body: Value,
}

/// Answers each accepted connection with the next canned `(status, body)`.
///
/// Same stub as in the sibling crate's HTTP tests; keep the two in sync.
fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut out = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut authorization = None;
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    match name.trim().to_ascii_lowercase().as_str() {
                        "authorization" => authorization = Some(value.trim().to_string()),
                        "content-length" => content_length = value.trim().parse().unwrap(),
                        _ => {}
                    }
                }
            }
            let mut buf = vec![0u8; content_length];
            reader.read_exact(&mut buf).unwrap();
            out.push(Recorded {
                request_line: request_line.trim_end().to_string(),
                authorization,
                body: serde_json::from_slice(&buf).unwrap_or(Value::Null),
            });
            write!(
                stream,
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
        out
    });
    (base, handle)
}

fn client(base: &str) -> OpenAiClient {
    OpenAiClient::new(&format!("{base}/v1"), "sk-test").unwrap()
}

#[test]
fn embed_batch_sends_all_inputs_and_orders_by_index() {
    let reply = json!({
        "data": [
            { "index": 1, "embedding": [0.0, 1.0] },
            { "index": 0, "embedding": [1.0, 0.0] }
        ]
    });
    let (base, handle) = serve(vec![(200, reply.to_string())]);
    let embedder = OpenAiEmbedder::new(client(&base));

    let vectors = embedder
        .embed_batch("text-embedding-3-large", &["first", "second"])
        .unwrap();
    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

    let recorded = handle.join().unwrap();
    assert_eq!(recorded[0].request_line, "POST /v1/embeddings HTTP/1.1");
    assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(
        recorded[0].body,
        json!({ "model": "text-embedding-3-large", "input": ["first", "second"] })
    );
}

#[test]
fn embedding_count_mismatch_is_rejected() {
    let reply = json!({ "data": [ { "index": 0, "embedding": [1.0] } ] });
    let (base, handle) = serve(vec![(200, reply.to_string())]);
    let embedder = OpenAiEmbedder::new(client(&base));

    let err = embedder.embed_batch("m", &["a", "b"]).unwrap_err();
    assert_eq!(err.code, "EXTERNAL_EMBEDDINGS_FAILED");
    handle.join().unwrap();
}

#[test]
fn rate_limited_embeddings_are_retryable() {
    let (base, handle) = serve(vec![(429, r#"{"error":"slow down"}"#.to_string())]);
    let embedder = OpenAiEmbedder::new(client(&base));

    let err = embedder.embed("m", "a").unwrap_err();
    assert_eq!(err.code, "EXTERNAL_EMBEDDINGS_FAILED");
    assert!(err.retryable);
    handle.join().unwrap();
}

#[test]
fn chat_omits_unset_temperature_and_reads_first_choice() {
    let reply = json!({
        "choices": [ { "message": { "role": "assistant", "content": "It encrypts files." } } ]
    });
    let (base, handle) = serve(vec![(200, reply.to_string())]);
    let chat = OpenAiChat::new(client(&base));

    let answer = chat.generate("gpt-4o", "What does ransomware do?", None).unwrap();
    assert_eq!(answer, "It encrypts files.");

    let recorded = handle.join().unwrap();
    assert_eq!(recorded[0].request_line, "POST /v1/chat/completions HTTP/1.1");
    assert_eq!(
        recorded[0].body,
        json!({
            "model": "gpt-4o",
            "messages": [ { "role": "user", "content": "What does ransomware do?" } ]
        })
    );
}

#[test]
fn chat_sends_explicit_zero_temperature() {
    let reply = json!({ "choices": [ { "message": { "content": "<h3>Intro</h3>" } } ] });
    let (base, handle) = serve(vec![(200, reply.to_string())]);
    let chat = OpenAiChat::new(client(&base));

    chat.generate("gpt-4o-mini", "write", Some(0.0)).unwrap();
    let recorded = handle.join().unwrap();
    assert_eq!(recorded[0].body["temperature"], json!(0.0));
}

#[test]
fn empty_chat_reply_is_an_error() {
    let reply = json!({ "choices": [] });
    let (base, handle) = serve(vec![(200, reply.to_string())]);
    let chat = OpenAiChat::new(client(&base));

    let err = chat.generate("gpt-4o", "q", None).unwrap_err();
    assert_eq!(err.code, "EXTERNAL_LLM_FAILED");
    handle.join().unwrap();
}
