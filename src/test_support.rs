//! Collaborator doubles shared by unit tests.

use crate::error::TransportError;
use crate::selection::PendingFile;
use crate::upload::{FileStatus, ProgressFn, RetryConfirmer, Severity, StatusSink, UploadTransport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct StubTransport {
    failures: Mutex<HashMap<String, u32>>,
    always_fail: bool,
    progress: HashMap<String, Vec<f64>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    calls: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn url_for(name: &str) -> String {
        format!("https://cdn.example.com/{}", name)
    }

    /// Fails `times` uploads of `name`; `u32::MAX` fails forever.
    pub fn failing(self, name: &str, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(name.to_string(), times);
        self
    }

    pub fn always_failing(mut self) -> Self {
        self.always_fail = true;
        self
    }

    pub fn with_progress(mut self, name: &str, steps: &[f64]) -> Self {
        self.progress.insert(name.to_string(), steps.to_vec());
        self
    }

    /// Signals `entered` on each upload, then waits for `release`.
    pub fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((entered, release));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadTransport for StubTransport {
    async fn upload(
        &self,
        file: &PendingFile,
        on_progress: &ProgressFn<'_>,
    ) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(file.name.clone());

        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        for step in self.progress.get(&file.name).into_iter().flatten() {
            on_progress(*step);
        }

        if self.always_fail {
            return Err(TransportError::Network("connection reset".to_string()));
        }

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&file.name) {
                if *remaining > 0 {
                    if *remaining != u32::MAX {
                        *remaining -= 1;
                    }
                    return Err(TransportError::Server {
                        status: 502,
                        message: "Bad Gateway".to_string(),
                    });
                }
            }
        }

        on_progress(100.0);
        Ok(Self::url_for(&file.name))
    }
}

#[derive(Default)]
pub struct RecordingConfirmer {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<(usize, usize)>>,
}

impl RecordingConfirmer {
    /// Answers in order, then declines.
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<(usize, usize)> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetryConfirmer for RecordingConfirmer {
    async fn confirm_retry(&self, failed: usize, succeeded: usize) -> bool {
        self.asked.lock().unwrap().push((failed, succeeded));
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(String, Severity)>>,
    progress: Mutex<Vec<f64>>,
    statuses: Mutex<Vec<FileStatus>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn messages_with(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(_, s)| *s == severity)
            .map(|(m, _)| m)
            .collect()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.progress.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<FileStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }

    fn report_progress(&self, percent: f64) {
        self.progress.lock().unwrap().push(percent);
    }

    fn file_status_changed(&self, status: &FileStatus) {
        self.statuses.lock().unwrap().push(status.clone());
    }
}
