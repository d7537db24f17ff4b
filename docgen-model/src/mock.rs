use async_trait::async_trait;
use docgen_core::{DocgenError, DocumentType, Result, TextGenerator};
use std::sync::Mutex;
use std::time::Duration;

enum Reply {
    Text(String),
    Failure { message: String, timed_out: bool },
}

/// Canned generator for tests and offline runs. Records every prompt it receives.
pub struct MockGenerator {
    model: String,
    reply: Reply,
    latency: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reply: Reply::Text(String::new()),
            latency: None,
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn with_response(mut self, text: impl Into<String>) -> Self {
        self.reply = Reply::Text(text.into());
        self
    }

    /// Replies with a markdown skeleton that has one heading per template section.
    pub fn with_outline_of(self, document_type: DocumentType) -> Self {
        let template = document_type.template();
        let mut text = format!("# {}\n\n", template.name);
        for section in template.sections {
            text.push_str(&format!("## {}. {}\n\n", section.number, section.title));
            for sub in section.subsections {
                text.push_str(&format!("### {} {}\n\n[To be determined]\n\n", sub.id, sub.title));
            }
        }
        self.with_response(text)
    }

    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.reply = Reply::Failure { message: message.into(), timed_out: false };
        self
    }

    pub fn with_timeout(mut self) -> Self {
        self.reply = Reply::Failure { message: "Generation service timed out".into(), timed_out: true };
        self
    }

    /// Sleeps for `latency` before replying.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Failure { message, timed_out: false } => Err(DocgenError::generation(message.clone())),
            Reply::Failure { message, timed_out: true } => {
                Err(DocgenError::generation_timeout(message.clone()))
            }
        }
    }
}
