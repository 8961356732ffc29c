//! Scripted conversion service for orchestrator tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::options::BatchOptions;
use crate::service::{ConversionService, ServiceError, UploadSignal};
use crate::source::SourceFile;

/// How the fake service treats one file (looked up by name).
#[derive(Debug, Clone)]
pub(crate) struct Script {
    /// How many of the `UPLOAD_STEPS` quarter ticks are reported before the
    /// body counts as sent (coarse transports skip the last ones).
    pub reported_steps: u64,
    /// Send `UploadSignal::Sent` after the upload ticks.
    pub signal_sent: bool,
    /// Simulated remote processing time after the upload.
    pub processing: Duration,
    /// `None` → success with a link derived from the file name.
    pub failure: Option<ServiceError>,
    /// Queue a stale upload tick and a second `Sent` right before answering,
    /// so they are pending when the result arrives.
    pub stale_signals: bool,
    /// Keep sending signals after the result was returned.
    pub late_signals: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            reported_steps: UPLOAD_STEPS,
            signal_sent: true,
            processing: Duration::from_secs(2),
            failure: None,
            stale_signals: false,
            late_signals: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Convert(String),
    Bundle(Vec<String>),
}

pub(crate) struct ScriptedService {
    scripts: HashMap<String, Script>,
    bundle: Result<String, ServiceError>,
    bundle_delay: Duration,
    calls: Mutex<Vec<Call>>,
}

pub(crate) const UPLOAD_STEPS: u64 = 4;
pub(crate) const UPLOAD_STEP: Duration = Duration::from_millis(100);

impl ScriptedService {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            bundle: Ok("/downloads/batch_0001.zip".to_string()),
            bundle_delay: Duration::from_millis(50),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(mut self, name: &str, script: Script) -> Self {
        self.scripts.insert(name.to_string(), script);
        self
    }

    pub fn failing(self, name: &str, error: ServiceError) -> Self {
        self.script(
            name,
            Script {
                failure: Some(error),
                ..Script::default()
            },
        )
    }

    pub fn bundle_result(mut self, result: Result<String, ServiceError>) -> Self {
        self.bundle = result;
        self
    }

    pub fn bundle_delay(mut self, delay: Duration) -> Self {
        self.bundle_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn convert_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Convert(name) => Some(name),
                Call::Bundle(_) => None,
            })
            .collect()
    }

    pub fn bundle_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Bundle(files) => Some(files),
                Call::Convert(_) => None,
            })
            .collect()
    }
}

/// Link the fake hands out for `name`: `/downloads/konverter_<stem>.<format>`.
pub(crate) fn link_for(name: &str, options: &BatchOptions) -> String {
    let stem = name.split('.').next().unwrap_or(name);
    format!("/downloads/konverter_{}.{}", stem, options.format)
}

pub(crate) fn file(name: &str) -> SourceFile {
    SourceFile {
        path: PathBuf::from("/videos").join(name),
        name: name.to_string(),
        size_bytes: 4096,
        mime_type: "video/mp4".to_string(),
    }
}

#[async_trait]
impl ConversionService for ScriptedService {
    async fn convert(
        &self,
        file: &SourceFile,
        options: &BatchOptions,
        signals: UnboundedSender<UploadSignal>,
    ) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push(Call::Convert(file.name.clone()));
        let script = self.scripts.get(&file.name).cloned().unwrap_or_default();

        let total = file.size_bytes.max(1);
        for step in 1..=script.reported_steps.min(UPLOAD_STEPS) {
            let _ = signals.send(UploadSignal::Progress {
                sent: total * step / UPLOAD_STEPS,
                total,
            });
            tokio::time::sleep(UPLOAD_STEP).await;
        }
        if script.signal_sent {
            let _ = signals.send(UploadSignal::Sent);
        }
        tokio::time::sleep(script.processing).await;

        if script.stale_signals {
            let _ = signals.send(UploadSignal::Progress { sent: 1, total });
            let _ = signals.send(UploadSignal::Sent);
            tokio::task::yield_now().await;
        }
        if script.late_signals {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                let _ = signals.send(UploadSignal::Progress { sent: 1, total: 2 });
                let _ = signals.send(UploadSignal::Sent);
            });
        }

        match script.failure {
            Some(e) => Err(e),
            None => Ok(link_for(&file.name, options)),
        }
    }

    async fn bundle(&self, filenames: &[String]) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push(Call::Bundle(filenames.to_vec()));
        tokio::time::sleep(self.bundle_delay).await;
        self.bundle.clone()
    }
}
