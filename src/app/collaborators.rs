use super::state::UploadState;
use super::{FormSubmitter, FormValidator};
use crate::error::SubmitError;
use crate::i18n::{messages, Translator};
use crate::selection::UploadStatus;
use crate::upload::{FileStatus, RetryConfirmer, Severity, StatusSink};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Valid when every required field has a non-blank value.
#[derive(Debug, Clone)]
pub struct RequiredFieldsValidator {
    fields: Vec<(String, String)>,
    required: Vec<String>,
    min_files: usize,
}

impl RequiredFieldsValidator {
    pub fn new(fields: Vec<(String, String)>, required: Vec<String>, min_files: usize) -> Self {
        Self {
            fields,
            required,
            min_files,
        }
    }

    pub fn missing_fields(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|name| {
                !self
                    .fields
                    .iter()
                    .any(|(key, value)| key == *name && !value.trim().is_empty())
            })
            .map(String::as_str)
            .collect()
    }
}

impl FormValidator for RequiredFieldsValidator {
    fn is_form_valid(&self) -> bool {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            tracing::info!(?missing, "required fields are empty");
        }
        missing.is_empty()
    }

    fn minimum_file_count(&self) -> usize {
        self.min_files
    }
}

type AnswerInput = Box<dyn AsyncBufRead + Send + Unpin>;

/// Asks on the terminal whether failed uploads should be retried.
///
/// Answers are read from one buffered reader for the confirmer's lifetime, so
/// piped input with several answers is consumed line by line.
pub struct ConsoleConfirmer {
    translator: Arc<dyn Translator>,
    input: tokio::sync::Mutex<AnswerInput>,
}

impl ConsoleConfirmer {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self::with_input(translator, BufReader::new(tokio::io::stdin()))
    }

    pub fn with_input<R>(translator: Arc<dyn Translator>, input: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        Self {
            translator,
            input: tokio::sync::Mutex::new(Box::new(input)),
        }
    }

    pub fn parse_answer(answer: &str) -> bool {
        matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "j" | "ja" | "o" | "oui"
        )
    }
}

#[async_trait]
impl RetryConfirmer for ConsoleConfirmer {
    async fn confirm_retry(&self, failed: usize, succeeded: usize) -> bool {
        println!(
            "{} [y/N]",
            messages::retry_prompt(self.translator.as_ref(), failed, succeeded)
        );

        let mut line = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut line).await {
            Ok(_) => Self::parse_answer(&line),
            Err(e) => {
                tracing::warn!(error = %e, "could not read retry answer, not retrying");
                false
            }
        }
    }
}

pub struct StdoutSubmitter {
    hidden_field: String,
    fields: Vec<(String, String)>,
}

impl StdoutSubmitter {
    pub fn new(hidden_field: String, fields: Vec<(String, String)>) -> Self {
        Self {
            hidden_field,
            fields,
        }
    }
}

#[async_trait]
impl FormSubmitter for StdoutSubmitter {
    async fn submit(&self, hidden_field_value: &str) -> Result<(), SubmitError> {
        for (name, value) in &self.fields {
            println!("{}: {}", name, value);
        }
        println!("{}:", self.hidden_field);
        for url in hidden_field_value.lines() {
            println!("  {}", url);
        }
        Ok(())
    }
}

/// Posts the form as `application/x-www-form-urlencoded` to its action URL.
pub struct HttpFormSubmitter {
    client: reqwest::Client,
    action: String,
    hidden_field: String,
    fields: Vec<(String, String)>,
    lang: Option<String>,
}

impl HttpFormSubmitter {
    pub fn new(
        action: String,
        hidden_field: String,
        fields: Vec<(String, String)>,
        lang: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            action,
            hidden_field,
            fields,
            lang,
        }
    }
}

#[async_trait]
impl FormSubmitter for HttpFormSubmitter {
    async fn submit(&self, hidden_field_value: &str) -> Result<(), SubmitError> {
        let mut form = self.fields.clone();
        form.push((self.hidden_field.clone(), hidden_field_value.to_string()));

        let mut request = self.client.post(&self.action).form(&form);
        if let Some(lang) = &self.lang {
            request = request.query(&[("lang", lang)]);
        }

        tracing::info!(action = %self.action, fields = form.len(), "submitting form");
        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::Submission(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Submission(format!(
                "form endpoint returned status {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

/// Prints messages and per-file results to the terminal.
pub struct ConsoleSink {
    state: Mutex<UploadState>,
    translator: Arc<dyn Translator>,
}

impl ConsoleSink {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            state: Mutex::new(UploadState::default()),
            translator,
        }
    }

    pub fn status_text(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_status_text(self.translator.as_ref())
    }
}

impl StatusSink for ConsoleSink {
    fn report(&self, message: &str, severity: Severity) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply_message(message, severity);
        match severity {
            Severity::Error | Severity::Warning => eprintln!("[{}] {}", severity, message),
            Severity::Success | Severity::Info => println!("[{}] {}", severity, message),
        }
    }

    fn report_progress(&self, percent: f64) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply_progress(percent);
    }

    fn file_status_changed(&self, status: &FileStatus) {
        let text = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.apply_status(status);
            state.get_status_text(self.translator.as_ref())
        };
        if matches!(status.status, UploadStatus::Uploaded | UploadStatus::Failed) {
            println!("{}", text);
        }
    }
}
