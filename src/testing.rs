//! In-memory service doubles shared by the stage and pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::CompletionService;
use crate::models::{WebPage, WebSearchRequest, WebSearchResponse};
use crate::search::{SearchReply, SearchService};

/// Completion double that replays queued answers and records every call
#[derive(Default)]
pub struct MockCompletion {
    answers: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl MockCompletion {
    pub fn with_answers(answers: &[&str]) -> Self {
        let mock = Self::default();
        for answer in answers {
            mock.push_answer(answer);
        }
        mock
    }

    pub fn push_answer(&self, answer: &str) {
        self.answers.lock().unwrap().push_back(Ok(answer.to_string()));
    }

    pub fn push_error(&self, message: &str) {
        self.answers
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(message.to_string())));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn run_names(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(&self, prompt: &str, run_name: Option<&str>) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), run_name.map(str::to_string)));

        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no mock answer queued")))
    }
}

/// Search double returning a fixed reply
pub struct MockSearch {
    reply: Mutex<Option<Result<SearchReply>>>,
    requests: Mutex<Vec<WebSearchRequest>>,
}

impl MockSearch {
    fn with_reply(reply: Result<SearchReply>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(pages: Vec<WebPage>) -> Self {
        let mut response = WebSearchResponse::default();
        response.data.web_pages.value = pages;
        Self::with_reply(Ok(SearchReply::Success(response)))
    }

    pub fn empty() -> Self {
        Self::pages(vec![])
    }

    pub fn status(status: u16) -> Self {
        Self::with_reply(Ok(SearchReply::Failed {
            status,
            body: "error".to_string(),
        }))
    }

    pub fn transport_error(message: &str) -> Self {
        Self::with_reply(Err(anyhow::anyhow!(message.to_string())))
    }

    pub fn requests(&self) -> Vec<WebSearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for MockSearch {
    async fn web_search(&self, request: &WebSearchRequest) -> Result<SearchReply> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(anyhow::anyhow!("search called more than once")))
    }
}

pub fn boiling_page() -> WebPage {
    WebPage {
        name: "Boiling point".to_string(),
        url: "https://example.org/boiling".to_string(),
        snippet: Some(
            "Water boils at 100°C (212°F) at standard pressure (Britannica, 2020).".to_string(),
        ),
        summary: None,
    }
}
