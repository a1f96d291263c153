//! # JSON flight inventory
//!
//! The backing file is a plain JSON array of flight legs. Every booking
//! rewrites it in three steps:
//!
//! 1. the pre-update collection is written to the backup path,
//! 2. the updated collection is written to a sibling temp file and synced,
//! 3. the temp file is renamed over the canonical path.
//!
//! Readers therefore only ever observe a complete old or complete new file.
//! Writers are funnelled through a single mutex held for the whole
//! read-modify-write cycle.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::temp_path;
use waypoint_core::inventory::{apply_decrement, ensure_unique_keys, validate_amount};
use waypoint_core::{CoreError, CoreResult, FlightLeg, InventoryStore, LegKey};

pub struct JsonFileInventory {
    path: PathBuf,
    backup_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileInventory {
    pub fn new(path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_path: backup_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    async fn read_legs(&self) -> CoreResult<Vec<FlightLeg>> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;

        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| unavailable(&self.path, e))?;
        if !value.is_array() {
            return Err(CoreError::StorageUnavailable(format!(
                "{} must be a plain array",
                self.path.display()
            )));
        }

        let legs: Vec<FlightLeg> =
            serde_json::from_value(value).map_err(|e| unavailable(&self.path, e))?;
        ensure_unique_keys(&legs)?;
        Ok(legs)
    }

    /// Overwrites the canonical file with `legs`, leaving `previous` in the
    /// backup file.
    async fn write_legs(&self, previous: &[FlightLeg], legs: &[FlightLeg]) -> CoreResult<()> {
        write_json(&self.backup_path, previous).await?;
        debug!("Wrote inventory backup to {:?}", self.backup_path);

        let temp_path = temp_path(&self.path);
        write_json(&temp_path, legs).await?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;

        info!("Persisted {} flight legs to {:?}", legs.len(), self.path);
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for JsonFileInventory {
    async fn load_all(&self) -> CoreResult<Vec<FlightLeg>> {
        let legs = self.read_legs().await?;
        debug!("Loaded {} flight legs from {:?}", legs.len(), self.path);
        Ok(legs)
    }

    async fn decrement_seats(&self, keys: &[LegKey], amount: u32) -> CoreResult<Vec<FlightLeg>> {
        validate_amount(amount)?;

        let _guard = self.write_lock.lock().await;

        let previous = self.read_legs().await?;
        let mut legs = previous.clone();
        let touched = apply_decrement(&mut legs, keys, amount);
        if touched < keys.len() {
            debug!(
                "{} of {} booking key(s) matched no leg; ignoring",
                keys.len() - touched,
                keys.len()
            );
        }

        self.write_legs(&previous, &legs).await?;
        info!("Took {} seat(s) from {} leg(s)", amount, touched);

        Ok(legs)
    }
}

async fn write_json(path: &Path, legs: &[FlightLeg]) -> CoreResult<()> {
    let body = serde_json::to_vec_pretty(legs).map_err(|e| unavailable(path, e))?;

    let mut file = fs::File::create(path).await.map_err(|e| unavailable(path, e))?;
    file.write_all(&body).await.map_err(|e| unavailable(path, e))?;
    file.sync_all().await.map_err(|e| unavailable(path, e))?;
    Ok(())
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> CoreError {
    CoreError::StorageUnavailable(format!("{}: {}", path.display(), err))
}
