//! Streaming download of a selected update asset, with fractional
//! progress reporting and atomic placement into the destination.
//!
//! The body is streamed to a `.part` file inside the destination
//! directory and renamed over the final path only after the full
//! transfer has been written and flushed, so a crash or failure
//! mid-download never leaves a truncated file at the destination.

use anyhow::anyhow;
use log::{debug, info};
use reqwest::StatusCode;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, UpdateError};
use crate::http::HttpClient;
use crate::resolve::AppUpdate;
use crate::runtime::Runtime;

/// Downloads `update` into `dest_dir` (the user's Downloads directory
/// when `None`) and returns the final path.
///
/// `on_progress` receives `bytes_received / total_expected` clamped to
/// [0, 1]. The total comes from the update's file size, falling back
/// to the response Content-Length; when the total is unknown or zero
/// the callback is never invoked. The callback runs on its own task
/// fed through a latest-value channel, so a slow consumer sees
/// coalesced fractions and never stalls the socket read loop. A
/// pre-existing file with the same name at the destination is
/// replaced.
#[tracing::instrument(skip(runtime, http, update, dest_dir, on_progress, cancel))]
pub async fn download_update<R: Runtime>(
    runtime: &R,
    http: &HttpClient,
    update: &AppUpdate,
    dest_dir: Option<&Path>,
    on_progress: impl Fn(f64) + Send + 'static,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    let dest_dir = match dest_dir {
        Some(dir) => dir.to_path_buf(),
        None => runtime
            .download_dir()
            .ok_or_else(|| UpdateError::Download(anyhow!("no downloads directory available")))?,
    };
    // Registry metadata is untrusted; only the final path component of
    // the asset name may name the destination file.
    let file_name = Path::new(&update.file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            UpdateError::Download(anyhow!("asset name {:?} is not a file name", update.file_name))
        })?;
    let dest_path = dest_dir.join(&file_name);
    // Same directory as the destination so the final rename stays on
    // one filesystem.
    let part_path = dest_dir.join(format!("{}.part", file_name));

    info!("Downloading {} -> {:?}", update.download_url, dest_path);

    runtime
        .create_dir_all(&dest_dir)
        .map_err(UpdateError::Download)?;

    let response = http
        .get(&update.download_url, &[], cancel)
        .await
        .map_err(into_download_error)?;

    if response.status() != StatusCode::OK {
        return Err(UpdateError::Download(anyhow::Error::from(
            UpdateError::InvalidResponse(format!(
                "unexpected HTTP status {} from {}",
                response.status().as_u16(),
                update.download_url
            )),
        )));
    }

    let total_bytes = update
        .file_size
        .or_else(|| response.content_length())
        .filter(|total| *total > 0);

    // The read loop publishes fractions into a watch channel and a
    // separate task invokes the callback. watch keeps only the latest
    // value, so intermediate fractions are dropped while the consumer
    // is busy and the loop never waits on it.
    let (progress_tx, mut progress_rx) = tokio::sync::watch::channel(0.0f64);
    let forwarder = tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let fraction = *progress_rx.borrow_and_update();
            on_progress(fraction);
        }
    });

    let streamed =
        stream_to_part(runtime, &part_path, response, total_bytes, &progress_tx, cancel).await;
    drop(progress_tx);

    if let Err(e) = streamed {
        let _ = runtime.remove_file(&part_path);
        let _ = forwarder.await;
        return Err(e);
    }

    // Last write wins: replace any file already at the destination
    if runtime.exists(&dest_path) {
        debug!("Replacing existing file at {:?}", dest_path);
        runtime
            .remove_file(&dest_path)
            .map_err(UpdateError::Download)?;
    }
    runtime
        .rename(&part_path, &dest_path)
        .map_err(UpdateError::Download)?;

    // The transfer is done at this point; waiting here only lets the
    // consumer observe the final fraction before the path is handed
    // back.
    let _ = forwarder.await;

    info!("Download complete: {:?}", dest_path);
    Ok(dest_path)
}

async fn stream_to_part<R: Runtime>(
    runtime: &R,
    part_path: &Path,
    mut response: reqwest::Response,
    total_bytes: Option<u64>,
    progress_tx: &tokio::sync::watch::Sender<f64>,
    cancel: &CancellationToken,
) -> Result<u64> {
    let mut writer = runtime
        .create_file(part_path)
        .map_err(UpdateError::Download)?;
    let mut received: u64 = 0;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(UpdateError::Cancelled),
            chunk = response.chunk() => chunk.map_err(|e| {
                UpdateError::Download(
                    anyhow::Error::from(e).context("failed to read chunk from download stream"),
                )
            })?,
        };
        let Some(chunk) = chunk else { break };

        writer.write_all(&chunk).map_err(|e| {
            UpdateError::Download(anyhow::Error::from(e).context("failed to write chunk"))
        })?;
        received += chunk.len() as u64;

        if let Some(total) = total_bytes {
            let _ = progress_tx.send((received as f64 / total as f64).clamp(0.0, 1.0));
        }
    }

    writer.flush().map_err(|e| {
        UpdateError::Download(anyhow::Error::from(e).context("failed to flush download"))
    })?;

    debug!(
        "Downloaded {:.2} MB",
        received as f64 / (1024.0 * 1024.0)
    );

    Ok(received)
}

/// In the download phase every failure is a download failure; only
/// cancellation keeps its identity.
fn into_download_error(err: UpdateError) -> UpdateError {
    match err {
        UpdateError::Cancelled => UpdateError::Cancelled,
        UpdateError::Network(e) => UpdateError::Download(anyhow::Error::from(e)),
        other => UpdateError::Download(anyhow::Error::from(other)),
    }
}
