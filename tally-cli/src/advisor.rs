//! Budgeting suggestions from an OpenAI-style chat-completions endpoint.
//!
//! `Advisor::suggest` never fails: missing credentials, transport errors,
//! non-2xx responses and malformed bodies all come back as
//! `Advice::Unavailable` with a message fit for display.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tally_report::SummaryDigest;
use tracing::{debug, warn};

use crate::config::AdvisorSection;

const SYSTEM_PROMPT: &str = "You are a practical personal-finance assistant. \
Given a savings goal and a summary of the user's recent transactions, suggest a \
short, concrete budget plan: which categories to trim, by roughly how much, and \
how long the goal will take at that pace.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    Recommendation(String),
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Advisor {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: Option<String>,
    api_key_env: String,
}

impl Advisor {
    /// Reads the API key from the environment variable named in the section.
    pub fn from_config(section: &AdvisorSection) -> Self {
        let api_key = std::env::var(&section.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", section.base_url.trim_end_matches('/')),
            model: section.model.clone(),
            temperature: section.temperature,
            max_tokens: section.max_tokens,
            api_key,
            api_key_env: section.api_key_env.clone(),
        }
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub async fn suggest(&self, goal: &str, digest: &SummaryDigest) -> Advice {
        match self.request(goal, digest).await {
            Ok(text) => Advice::Recommendation(text),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "advisor request failed");
                Advice::Unavailable(format!("{e:#}"))
            }
        }
    }

    async fn request(&self, goal: &str, digest: &SummaryDigest) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("no API key configured; set {}", self.api_key_env))?;

        let messages = build_messages(goal, digest)?;
        let body = Req {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "requesting suggestions");
        let resp = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {key}"))
            .json(&body)
            .send()
            .await
            .context("advisor request")?;

        let status = resp.status();
        let txt = resp.text().await.context("read advisor response")?;
        if !status.is_success() {
            bail!("advisor error: {status} {}", txt.trim());
        }

        let out: Resp = serde_json::from_str(&txt).context("parse advisor response")?;
        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            bail!("advisor returned an empty suggestion");
        }
        Ok(content)
    }
}

/// System persona plus one user turn carrying the goal and the digest.
pub fn build_messages(goal: &str, digest: &SummaryDigest) -> Result<Vec<ChatTurn>> {
    let summary_json = serde_json::to_string_pretty(digest).context("serialize summary digest")?;
    Ok(vec![
        ChatTurn {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatTurn {
            role: "user".to_string(),
            content: format!(
                "My goal: {}\n\nMy transaction summary (inflow, outflow, savings, per-category totals):\n{}",
                goal.trim(),
                summary_json
            ),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn digest() -> SummaryDigest {
        let mut category_totals = BTreeMap::new();
        category_totals.insert("Food".to_string(), 50.0);
        category_totals.insert("Transport".to_string(), 120.0);
        SummaryDigest {
            inflow_total: 1000.0,
            outflow_total: 170.0,
            savings: 830.0,
            category_totals,
        }
    }

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }
            let resp = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..split]
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= split + 4 + content_length
    }

    fn advisor(base_url: &str, key: Option<&str>) -> Advisor {
        let section = AdvisorSection {
            base_url: base_url.to_string(),
            api_key_env: "TALLY_TEST_UNSET_KEY".to_string(),
            ..AdvisorSection::default()
        };
        Advisor::from_config(&section)
            .with_api_key(key.map(str::to_string))
            .with_http_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[test]
    fn test_build_messages() {
        let msgs = build_messages("  Save 10,000 for emergency fund ", &digest()).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, "system");
        assert_eq!(msgs[1].role, "user");
        assert!(msgs[1].content.starts_with("My goal: Save 10,000 for emergency fund\n"));
        assert!(msgs[1].content.contains("\"outflow_total\": 170.0"));
        assert!(msgs[1].content.contains("\"Transport\": 120.0"));
    }

    #[tokio::test]
    async fn test_successful_suggestion() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"  Cut transport by 20%.  "}}]}"#,
        )
        .await;

        let advice = advisor(&url, Some("sk-test")).suggest("Save 10k", &digest()).await;
        assert_eq!(advice, Advice::Recommendation("Cut transport by 20%.".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /chat/completions"));
        assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains(r#""model":"sonar""#));
        assert!(request.contains(r#""max_tokens":500"#));
        assert!(request.contains(r#""role":"system""#));
    }

    #[tokio::test]
    async fn test_server_error_becomes_unavailable() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let advice = advisor(&url, Some("sk-test")).suggest("Save 10k", &digest()).await;
        server.await.unwrap();

        match advice {
            Advice::Unavailable(msg) => assert!(msg.contains("500"), "unexpected message: {msg}"),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_unavailable() {
        let (url, server) = serve_once("200 OK", "not json at all").await;
        let advice = advisor(&url, Some("sk-test")).suggest("Save 10k", &digest()).await;
        server.await.unwrap();

        match advice {
            Advice::Unavailable(msg) => assert!(msg.contains("parse advisor response")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_becomes_unavailable() {
        let (url, server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
        let advice = advisor(&url, Some("sk-test")).suggest("Save 10k", &digest()).await;
        server.await.unwrap();
        assert!(matches!(advice, Advice::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_key_becomes_unavailable() {
        let advice = advisor("http://127.0.0.1:9", None).suggest("Save 10k", &digest()).await;
        assert_eq!(
            advice,
            Advice::Unavailable("no API key configured; set TALLY_TEST_UNSET_KEY".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_becomes_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let advice = advisor(&url, Some("sk-test")).suggest("Save 10k", &digest()).await;
        match advice {
            Advice::Unavailable(msg) => assert!(msg.contains("advisor request")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
