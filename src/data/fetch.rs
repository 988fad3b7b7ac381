//! Dataset fetch pipeline.
//!
//! Uses channel-based communication to bridge async downloads
//! with egui's synchronous update loop.

use super::DatasetError;
use crate::geo::WorldDataset;
use crate::render::RenderGeneration;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Outcome of one render cycle's dataset request.
#[derive(Debug, Clone)]
pub struct DatasetResult {
    /// Render generation that issued the request
    pub generation: u64,
    pub outcome: Result<WorldDataset, DatasetError>,
}

/// Channel-based fetcher for the world boundaries dataset.
///
/// Fetches are async but egui's update() is synchronous. Each request is
/// tagged with a render generation; results for a generation that is no
/// longer current are dropped instead of drawn.
pub struct DatasetChannel {
    sender: Sender<DatasetResult>,
    receiver: Receiver<DatasetResult>,
    generation: RenderGeneration,
}

impl Default for DatasetChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            generation: RenderGeneration::new(),
        }
    }

    /// Starts a new render cycle and fetches the dataset for it.
    ///
    /// Returns the new generation. Any fetch still in flight for an older
    /// generation is superseded.
    pub fn begin(&self, ctx: egui::Context, url: String, object_name: String) -> u64 {
        let generation = self.generation.advance();
        log::debug!("Fetching dataset for render generation {}", generation);
        self.spawn_fetch(ctx, url, object_name, generation);
        generation
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_fetch(&self, ctx: egui::Context, url: String, object_name: String, generation: u64) {
        let sender = self.sender.clone();
        let latest = self.generation.clone();

        std::thread::spawn(move || {
            let outcome = fetch_dataset_native(&url, &object_name);
            send_if_current(&sender, &latest, DatasetResult { generation, outcome });
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn_fetch(&self, ctx: egui::Context, url: String, object_name: String, generation: u64) {
        let sender = self.sender.clone();
        let latest = self.generation.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = fetch_dataset(&url, &object_name).await;
            send_if_current(&sender, &latest, DatasetResult { generation, outcome });
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed fetch.
    ///
    /// Returns the result for the current generation if one has arrived.
    /// Stale results queued before a newer render started are discarded.
    pub fn try_recv(&self) -> Option<DatasetResult> {
        while let Ok(result) = self.receiver.try_recv() {
            if self.generation.is_current(result.generation) {
                return Some(result);
            }
            log::debug!(
                "Discarding dataset for superseded render generation {}",
                result.generation
            );
        }
        None
    }
}

fn send_if_current(
    sender: &Sender<DatasetResult>,
    latest: &RenderGeneration,
    result: DatasetResult,
) {
    if !latest.is_current(result.generation) {
        log::debug!(
            "Render generation {} superseded before its dataset arrived",
            result.generation
        );
        return;
    }
    let _ = sender.send(result);
}

/// Fetches and decodes the dataset in the browser.
#[cfg(target_arch = "wasm32")]
async fn fetch_dataset(url: &str, object_name: &str) -> Result<WorldDataset, DatasetError> {
    use gloo_net::http::Request;

    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| DatasetError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(DatasetError::Http(resp.status()));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| DatasetError::Network(e.to_string()))?;
    log::info!("Downloaded {} bytes from {}", text.len(), url);

    WorldDataset::from_json(&text, object_name)
}

/// Native fetch using a blocking client on a worker thread.
#[cfg(not(target_arch = "wasm32"))]
fn fetch_dataset_native(url: &str, object_name: &str) -> Result<WorldDataset, DatasetError> {
    let resp = reqwest::blocking::get(url).map_err(|e| DatasetError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DatasetError::Http(status.as_u16()));
    }

    let text = resp
        .text()
        .map_err(|e| DatasetError::Network(e.to_string()))?;
    log::info!("Downloaded {} bytes from {}", text.len(), url);

    WorldDataset::from_json(&text, object_name)
}
