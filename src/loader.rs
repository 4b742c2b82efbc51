use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::dataset::Dataset;
use crate::state::Delta;

/// Loads the dataset once off the UI thread and feeds the result back as a
/// delta. A failed load is reported on the console; the picker stays
/// disabled until a dataset arrives.
pub fn spawn_dataset_loader(source: String, tx: Sender<Delta>) {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(format!("[INFO] Loading dataset from {source}")));
        match load_dataset(&source) {
            Ok(dataset) => {
                let _ = tx.send(Delta::Log(format!(
                    "[INFO] Dataset ready: {} players",
                    dataset.len()
                )));
                let _ = tx.send(Delta::Dataset(dataset));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[ERROR] Dataset load failed: {err:#}")));
            }
        }
    });
}

pub fn load_dataset(source: &str) -> Result<Dataset> {
    let raw = read_source(source)?;
    Dataset::parse(&raw).with_context(|| format!("parse dataset {source}"))
}

fn read_source(source: &str) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        let response = client
            .get(source)
            .send()
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("fetch {source}"))?;
        response.text().context("read dataset body")
    } else {
        std::fs::read_to_string(source).with_context(|| format!("read {source}"))
    }
}
