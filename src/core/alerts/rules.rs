// Detection rules. Pure with respect to history: every call re-derives the
// candidate set from the snapshot it is given. The evaluation instant is a
// parameter so tests can pin the clock.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::model::{next_alert_id, Alert, AlertKind, AlertStatus, Severity};
use super::suggestions::SuggestionTables;
use crate::core::model::{is_out_of_range, CityEvent, SensorData};

/// Minimum same-type reports in one place within the window.
pub const CLUSTER_MIN_COUNT: usize = 5;
/// Trailing window for the cluster rule.
pub const CLUSTER_WINDOW_MINUTES: i64 = 60;
/// Consecutive out-of-range readings required by the abnormal rule.
pub const ABNORMAL_SAMPLE_COUNT: usize = 3;

/// Run both rules over a snapshot. Candidates are unfiltered and
/// unpersisted; deduplication happens downstream.
pub fn detect(
    events: &[CityEvent],
    sensors: &[SensorData],
    now: DateTime<Utc>,
    tables: &SuggestionTables,
) -> Vec<Alert> {
    let mut candidates = detect_cluster_alerts(events, now, tables);
    candidates.extend(detect_abnormal_alerts(sensors, now, tables));
    candidates
}

/// Cluster rule: group events by (district, street, type); fire once per
/// group whose trailing-hour subset reaches `CLUSTER_MIN_COUNT`.
pub fn detect_cluster_alerts(
    events: &[CityEvent],
    now: DateTime<Utc>,
    tables: &SuggestionTables,
) -> Vec<Alert> {
    let mut groups: HashMap<(&str, &str, &str), Vec<&CityEvent>> = HashMap::new();
    for event in events {
        let key = (
            event.location.district.as_str(),
            event.location.street.as_str(),
            event.kind.as_str(),
        );
        groups.entry(key).or_default().push(event);
    }

    let cutoff = now - Duration::minutes(CLUSTER_WINDOW_MINUTES);
    let mut alerts = Vec::new();

    for ((district, street, kind), group) in groups {
        let recent: Vec<&CityEvent> = group
            .into_iter()
            .filter(|event| event.report_time >= cutoff)
            .collect();
        if recent.len() < CLUSTER_MIN_COUNT {
            continue;
        }

        let severity = cluster_severity(recent.len());
        alerts.push(Alert {
            id: next_alert_id(AlertKind::Cluster, now),
            kind: AlertKind::Cluster,
            title: format!("{district} - clustered incident alert"),
            description: format!(
                "{district} {street} logged {} {kind} reports within the last hour; \
                 a systemic problem is likely.",
                recent.len()
            ),
            level: severity,
            location: recent[0].location.clone(),
            trigger_time: now,
            related_events: recent.into_iter().cloned().collect(),
            related_sensors: Vec::new(),
            ai_suggestion: tables.event_suggestion(kind, district),
            status: AlertStatus::Pending,
            priority: severity,
        });
    }

    alerts
}

/// Abnormal-sensor rule: per sensor, the 3 most recent readings must all
/// carry an out-of-range status. Fewer than 3 total readings never fires.
pub fn detect_abnormal_alerts(
    sensors: &[SensorData],
    now: DateTime<Utc>,
    tables: &SuggestionTables,
) -> Vec<Alert> {
    let mut groups: HashMap<&str, Vec<&SensorData>> = HashMap::new();
    for reading in sensors {
        groups.entry(reading.sensor_id.as_str()).or_default().push(reading);
    }

    let mut alerts = Vec::new();

    for (_, mut readings) in groups {
        if readings.len() < ABNORMAL_SAMPLE_COUNT {
            continue;
        }
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let recent = &readings[..ABNORMAL_SAMPLE_COUNT];
        if !recent.iter().all(|r| is_out_of_range(&r.status)) {
            continue;
        }

        let newest = recent[0];
        let severity = abnormal_severity(recent);
        let values = recent
            .iter()
            .map(|r| r.value.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let peak = recent.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);

        alerts.push(Alert {
            id: next_alert_id(AlertKind::Abnormal, now),
            kind: AlertKind::Abnormal,
            title: format!("{} - sensor anomaly alert", newest.location.district),
            description: format!(
                "The {} sensor at {} {} reported out-of-range values on its last {} \
                 readings ({}{}); the equipment or its environment needs attention.",
                newest.kind,
                newest.location.district,
                newest.location.street,
                ABNORMAL_SAMPLE_COUNT,
                values,
                newest.unit
            ),
            level: severity,
            location: newest.location.clone(),
            trigger_time: now,
            related_events: Vec::new(),
            related_sensors: recent.iter().map(|r| (*r).clone()).collect(),
            ai_suggestion: tables.sensor_suggestion(&newest.kind, &newest.location.district, peak),
            status: AlertStatus::Pending,
            priority: severity,
        });
    }

    alerts
}

/// 10+ recent reports is high, 7+ medium, otherwise low.
pub fn cluster_severity(recent_count: usize) -> Severity {
    if recent_count >= 10 {
        Severity::High
    } else if recent_count >= 7 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Severity from how far the readings sit above the sensor threshold:
/// mean(value) / mean(threshold), 3x is high and 2x medium.
pub fn abnormal_severity(readings: &[&SensorData]) -> Severity {
    let avg_value: f64 = readings.iter().map(|r| r.value).sum::<f64>() / readings.len() as f64;
    let avg_threshold: f64 =
        readings.iter().map(|r| r.threshold).sum::<f64>() / readings.len() as f64;
    let ratio = avg_value / avg_threshold;

    if ratio >= 3.0 {
        Severity::High
    } else if ratio >= 2.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}
