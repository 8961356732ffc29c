//! Conversion service client built on libcurl.
//!
//! Each request runs on a blocking thread (`spawn_blocking`); upload progress
//! from curl's progress callback is forwarded over the caller's channel.

use anyhow::{Context, Result};
use async_trait::async_trait;
use curl::easy::{Easy, Form, List};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use super::error::{ServiceError, TransportKind};
use super::response::{parse_download_reply, parse_stats_reply};
use super::{ConversionService, UploadSignal};
use crate::config::KonvConfig;
use crate::options::BatchOptions;
use crate::source::SourceFile;

pub const CONVERT_PATH: &str = "api/convert";
pub const ZIP_PATH: &str = "api/zip";
pub const STATS_PATH: &str = "api/stats";

#[derive(Debug, Clone, Copy)]
struct Timeouts {
    connect: Duration,
    request: Duration,
}

/// HTTP client for the convert, zip and stats endpoints.
#[derive(Debug, Clone)]
pub struct CurlService {
    base: Url,
    timeouts: Timeouts,
}

impl CurlService {
    /// `service_url` is the service root; endpoints are resolved beneath it.
    pub fn new(service_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(service_url)
            .with_context(|| format!("invalid service URL: {}", service_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("service URL cannot be used as a base: {}", service_url);
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            timeouts: Timeouts {
                connect: connect_timeout,
                request: request_timeout,
            },
        })
    }

    pub fn from_config(cfg: &KonvConfig) -> Result<Self> {
        Self::new(
            &cfg.service_url,
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<String, ServiceError> {
        self.base
            .join(path)
            .map(String::from)
            .map_err(|e| ServiceError::transport(TransportKind::Other, format!("endpoint {}: {}", path, e)))
    }

    /// Reads the service's total conversion counter.
    pub async fn stats(&self) -> Result<u64, ServiceError> {
        let url = self.endpoint(STATS_PATH)?;
        let timeouts = self.timeouts;
        tokio::task::spawn_blocking(move || get_stats(&url, timeouts))
            .await
            .map_err(join_error)?
    }
}

#[async_trait]
impl ConversionService for CurlService {
    async fn convert(
        &self,
        file: &SourceFile,
        options: &BatchOptions,
        signals: UnboundedSender<UploadSignal>,
    ) -> Result<String, ServiceError> {
        let url = self.endpoint(CONVERT_PATH)?;
        let file = file.clone();
        let options = *options;
        let timeouts = self.timeouts;
        tokio::task::spawn_blocking(move || post_convert(&url, &file, options, timeouts, &signals))
            .await
            .map_err(join_error)?
    }

    async fn bundle(&self, filenames: &[String]) -> Result<String, ServiceError> {
        let url = self.endpoint(ZIP_PATH)?;
        let body = serde_json::json!({ "files": filenames }).to_string();
        let timeouts = self.timeouts;
        tokio::task::spawn_blocking(move || post_zip(&url, body, timeouts))
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: tokio::task::JoinError) -> ServiceError {
    ServiceError::transport(TransportKind::Aborted, format!("request task join: {}", e))
}

fn new_easy(url: &str, timeouts: Timeouts) -> Result<Easy, ServiceError> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.request)?;
    Ok(easy)
}

/// Runs the transfer, collecting the response body. Returns (status, body).
fn perform_collect(easy: &mut Easy) -> Result<(u32, Vec<u8>), ServiceError> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let code = easy.response_code()?;
    Ok((code, body))
}

/// Multipart upload of one file. Blocking; call from `spawn_blocking`.
fn post_convert(
    url: &str,
    file: &SourceFile,
    options: BatchOptions,
    timeouts: Timeouts,
    signals: &UnboundedSender<UploadSignal>,
) -> Result<String, ServiceError> {
    let mut easy = new_easy(url, timeouts)?;

    let mut form = Form::new();
    form.part("file")
        .file(&file.path)
        .filename(&file.name)
        .content_type(&file.mime_type)
        .add()?;
    form.part("format")
        .contents(options.format.as_str().as_bytes())
        .add()?;
    form.part("quality")
        .contents(options.quality.as_str().as_bytes())
        .add()?;
    easy.httppost(form)?;

    // No 100-continue round trip; the service reads the body directly.
    let mut headers = List::new();
    headers.append("Expect:")?;
    easy.http_headers(headers)?;
    easy.progress(true)?;

    let mut body = Vec::new();
    let mut sent = false;
    {
        let mut transfer = easy.transfer();
        transfer.progress_function(|_dltotal, _dlnow, ultotal, ulnow| {
            if ultotal > 0.0 && !sent {
                let _ = signals.send(UploadSignal::Progress {
                    sent: ulnow as u64,
                    total: ultotal as u64,
                });
                if ulnow >= ultotal {
                    sent = true;
                    let _ = signals.send(UploadSignal::Sent);
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    // A response implies the body was fully sent, even if no callback saw it.
    if !sent {
        let _ = signals.send(UploadSignal::Sent);
    }

    let code = easy.response_code()?;
    tracing::debug!(file = %file.name, code, "convert response");
    parse_download_reply(code, &body, "Conversion failed")
}

fn post_zip(url: &str, json: String, timeouts: Timeouts) -> Result<String, ServiceError> {
    let mut easy = new_easy(url, timeouts)?;
    easy.post(true)?;
    easy.post_fields_copy(json.as_bytes())?;
    let mut headers = List::new();
    headers.append("Content-Type: application/json")?;
    headers.append("Expect:")?;
    easy.http_headers(headers)?;

    let (code, body) = perform_collect(&mut easy)?;
    tracing::debug!(code, "zip response");
    parse_download_reply(code, &body, "Zip creation failed")
}

fn get_stats(url: &str, timeouts: Timeouts) -> Result<u64, ServiceError> {
    let mut easy = new_easy(url, timeouts)?;
    let (code, body) = perform_collect(&mut easy)?;
    parse_stats_reply(code, &body)
}
