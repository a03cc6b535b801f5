// Alert entity and its supporting enums.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::model::{CityEvent, Location, SensorData};

/// Which heuristic raised the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Many same-type events accumulated in one place within a short window.
    Cluster,
    /// A single sensor sustained out-of-range readings across samples.
    Abnormal,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Abnormal => "abnormal",
        }
    }
}

/// Shared scale for both `level` and `priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Operator-driven lifecycle. The only Alert field mutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Processing,
    Resolved,
}

/// An operator-facing alert. Created by the rule engine, persisted by the
/// store, and afterwards only status-transitioned or deleted - never
/// silently overwritten by a later detection cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub level: Severity,
    pub location: Location,
    pub trigger_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_events: Vec<CityEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_sensors: Vec<SensorData>,
    pub ai_suggestion: String,
    pub status: AlertStatus,
    pub priority: Severity,
}

static ALERT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Build a unique alert id: epoch millis plus a process-wide sequence, so
/// ids created within the same millisecond never collide.
pub fn next_alert_id(kind: AlertKind, now: DateTime<Utc>) -> String {
    let seq = ALERT_SEQ.fetch_add(1, Ordering::SeqCst);
    format!("alert_{}_{}_{}", kind.as_str(), now.timestamp_millis(), seq)
}

/// Counts projected over the current alert set. Recomputed on demand, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatistics {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub resolved: usize,
    pub cluster_count: usize,
    pub abnormal_count: usize,
    pub high_level_count: usize,
}

impl AlertStatistics {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        Self {
            total: alerts.len(),
            pending: alerts.iter().filter(|a| a.status == AlertStatus::Pending).count(),
            processing: alerts.iter().filter(|a| a.status == AlertStatus::Processing).count(),
            resolved: alerts.iter().filter(|a| a.status == AlertStatus::Resolved).count(),
            cluster_count: alerts.iter().filter(|a| a.kind == AlertKind::Cluster).count(),
            abnormal_count: alerts.iter().filter(|a| a.kind == AlertKind::Abnormal).count(),
            high_level_count: alerts.iter().filter(|a| a.level == Severity::High).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn make_alert(kind: AlertKind, level: Severity, status: AlertStatus) -> Alert {
        let now = Utc::now();
        Alert {
            id: next_alert_id(kind, now),
            kind,
            title: "test".to_string(),
            description: "test".to_string(),
            level,
            location: Location {
                district: "Riverside".to_string(),
                street: "Main".to_string(),
                lat: 0.0,
                lng: 0.0,
            },
            trigger_time: now,
            related_events: Vec::new(),
            related_sensors: Vec::new(),
            ai_suggestion: String::new(),
            status,
            priority: level,
        }
    }

    #[test]
    fn test_ids_unique_in_burst() {
        // All stamped with the same instant; the sequence must disambiguate.
        let now = Utc::now();
        let ids: HashSet<String> = (0..1000)
            .map(|_| next_alert_id(AlertKind::Cluster, now))
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_statistics_projection() {
        let alerts = vec![
            make_alert(AlertKind::Cluster, Severity::High, AlertStatus::Pending),
            make_alert(AlertKind::Cluster, Severity::Low, AlertStatus::Resolved),
            make_alert(AlertKind::Abnormal, Severity::High, AlertStatus::Processing),
        ];
        let stats = AlertStatistics::from_alerts(&alerts);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.processing, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.cluster_count, 2);
        assert_eq!(stats.abnormal_count, 1);
        assert_eq!(stats.high_level_count, 2);
    }

    #[test]
    fn test_alert_serde_wire_names() {
        let alert = make_alert(AlertKind::Abnormal, Severity::Medium, AlertStatus::Pending);
        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"type\":\"abnormal\""));
        assert!(json.contains("\"triggerTime\""));
        assert!(json.contains("\"aiSuggestion\""));
        // Empty related slices stay off the wire.
        assert!(!json.contains("relatedEvents"));

        let back: Alert = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, alert.id);
        assert_eq!(back.level, Severity::Medium);
    }
}
