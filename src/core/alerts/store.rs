//! Durable alert collection.
//!
//! The whole collection is read and written as one JSON document, matching
//! the upstream dashboard's storage blob. Every mutation saves first and
//! commits to memory only on success, so a persistence failure leaves the
//! in-memory list exactly as it was.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::model::{Alert, AlertStatistics, AlertStatus};
use crate::core::error::CoreError;

/// Whole-collection persistence seam. Implementations only need
/// at-least-eventually-durable read/write of the full alert list.
pub trait AlertPersistence: Send {
    fn load(&self) -> Result<Vec<Alert>, CoreError>;
    fn save(&self, alerts: &[Alert]) -> Result<(), CoreError>;
}

/// Stores the alert collection as `alerts.json` in a data directory.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("alerts.json"),
        }
    }
}

impl AlertPersistence for JsonFileBackend {
    fn load(&self) -> Result<Vec<Alert>, CoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, alerts: &[Alert]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(alerts)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Keeps the collection in memory only. Useful for tests and ephemeral
/// deployments that do not need alerts to survive a restart.
#[derive(Default)]
pub struct MemoryBackend {
    alerts: Mutex<Vec<Alert>>,
}

impl AlertPersistence for MemoryBackend {
    fn load(&self) -> Result<Vec<Alert>, CoreError> {
        Ok(self.alerts.lock().unwrap().clone())
    }

    fn save(&self, alerts: &[Alert]) -> Result<(), CoreError> {
        *self.alerts.lock().unwrap() = alerts.to_vec();
        Ok(())
    }
}

/// CRUD plus statistics over the current alert set, newest first. No
/// detection logic lives here.
pub struct AlertStore {
    backend: Box<dyn AlertPersistence>,
    alerts: Vec<Alert>,
}

impl AlertStore {
    /// Open the store, loading whatever the backend currently holds.
    pub fn new(backend: Box<dyn AlertPersistence>) -> Result<Self, CoreError> {
        let alerts = backend.load()?;
        Ok(Self { backend, alerts })
    }

    /// Current alerts, most recently triggered first.
    pub fn list(&self) -> &[Alert] {
        &self.alerts
    }

    /// Prepend a new alert and persist the full set.
    pub fn add(&mut self, alert: Alert) -> Result<(), CoreError> {
        let mut next = Vec::with_capacity(self.alerts.len() + 1);
        next.push(alert);
        next.extend(self.alerts.iter().cloned());
        self.backend.save(&next)?;
        self.alerts = next;
        Ok(())
    }

    /// Transition an alert's status. Returns `Ok(false)` if the id is
    /// unknown.
    pub fn update_status(&mut self, id: &str, status: AlertStatus) -> Result<bool, CoreError> {
        let Some(index) = self.alerts.iter().position(|a| a.id == id) else {
            return Ok(false);
        };
        let mut next = self.alerts.clone();
        next[index].status = status;
        self.backend.save(&next)?;
        self.alerts = next;
        Ok(true)
    }

    /// Delete an alert. Returns `Ok(false)` if the id is unknown.
    pub fn remove(&mut self, id: &str) -> Result<bool, CoreError> {
        let next: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        if next.len() == self.alerts.len() {
            return Ok(false);
        }
        self.backend.save(&next)?;
        self.alerts = next;
        Ok(true)
    }

    /// Counts by status, kind, and high level. Recomputed on demand.
    pub fn statistics(&self) -> AlertStatistics {
        AlertStatistics::from_alerts(&self.alerts)
    }

    /// Drop every alert, persisting the empty set.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.backend.save(&[])?;
        self.alerts.clear();
        Ok(())
    }
}
