//! `konv convert` – upload the selected videos one by one and print the result link.

use anyhow::{bail, Result};
use konv_core::batch::{BatchOutcome, BatchSession, ItemStatus};
use konv_core::config::KonvConfig;
use konv_core::events::{BatchEvent, ChannelObserver, ItemEvent};
use konv_core::options::{BatchOptions, Format, Quality};
use konv_core::scheduler::{self, RunPolicy};
use konv_core::service::CurlService;
use konv_core::source;
use konv_core::url_model::resolve_link;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;
use url::Url;

const PROGRESS_INTERVAL_MS: u128 = 500;

#[derive(Debug)]
pub struct ConvertArgs {
    pub paths: Vec<PathBuf>,
    pub format: Format,
    pub quality: Quality,
}

pub async fn run_convert(cfg: &KonvConfig, args: ConvertArgs) -> Result<()> {
    let selection = source::select_videos(&args.paths)?;
    for path in &selection.skipped {
        eprintln!("skipping {} (not a video file)", path.display());
    }
    if selection.files.is_empty() {
        bail!("no video files selected");
    }

    let service = CurlService::from_config(cfg)?;
    let policy = RunPolicy::from_config(cfg);
    let options = BatchOptions {
        format: args.format,
        quality: args.quality,
    };
    let names: Vec<String> = selection.files.iter().map(|f| f.name.clone()).collect();
    println!(
        "Converting {} file(s) to {} ({} quality) via {}",
        names.len(),
        options.format,
        options.quality,
        service.base_url()
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<BatchEvent>();
    let printer = tokio::spawn(async move {
        let mut last_print: Vec<Option<(Instant, ItemStatus)>> = vec![None; names.len()];
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::Item(ev) => {
                    let now = Instant::now();
                    // Status changes always print; progress-only updates are throttled.
                    let due = match last_print.get(ev.index).copied().flatten() {
                        Some((at, status)) => {
                            status != ev.status
                                || now.duration_since(at).as_millis() >= PROGRESS_INTERVAL_MS
                        }
                        None => true,
                    };
                    if due {
                        let name = names.get(ev.index).map(String::as_str).unwrap_or("?");
                        println!("{}", progress_line(name, names.len(), &ev));
                        if let Some(slot) = last_print.get_mut(ev.index) {
                            *slot = Some((now, ev.status));
                        }
                    }
                }
                BatchEvent::Finished(_) => break,
            }
        }
    });

    let mut observer = ChannelObserver::new(tx);
    let mut rng = StdRng::from_entropy();
    let session = scheduler::run_batch(&service, selection.files, options, &policy, &mut observer, &mut rng).await;
    drop(observer);
    let _ = printer.await;

    print_summary(&session, service.base_url());
    if session.done_count() == 0 {
        bail!("no file was converted");
    }
    Ok(())
}

fn progress_line(name: &str, total: usize, ev: &ItemEvent) -> String {
    let head = format!("[{}/{}] {:<10} {:>3}%  {}", ev.index + 1, total, ev.status.as_str(), ev.progress_percent, name);
    match (&ev.download_url, &ev.error) {
        (_, Some(err)) => format!("{}  ({})", head, err),
        _ => head,
    }
}

fn print_summary(session: &BatchSession, base: &Url) {
    println!();
    println!("Successfully processed {} file(s)", session.done_count());
    for item in session.items() {
        match (item.download_url(), item.error()) {
            (Some(link), _) => println!("  ok      {}  {}", item.file().name, resolve_link(base, link)),
            (_, Some(err)) => println!("  failed  {}  {}", item.file().name, err),
            _ => println!("  {:<7} {}", item.status().as_str(), item.file().name),
        }
    }

    match session.outcome() {
        Some(BatchOutcome::SingleDownload(link)) => {
            println!("Download: {}", resolve_link(base, link));
        }
        Some(BatchOutcome::BundleDownload(link)) => {
            println!("Download all: {}", resolve_link(base, link));
        }
        Some(BatchOutcome::BundleUnavailable(err)) => {
            println!("Bundle unavailable ({}); use the individual links above.", err);
        }
        Some(BatchOutcome::NoSuccessfulItems) | None => {}
    }
}
