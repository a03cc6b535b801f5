use serde::{Deserialize, Serialize};

use chrono::{DateTime, Utc};

pub type District = String;
pub type Street = String;

/// Sensor status flags as reported by the upstream feed. The core trusts
/// these rather than recomputing them from value/threshold.
pub const SENSOR_STATUS_NORMAL: &str = "normal";
pub const SENSOR_STATUS_ABNORMAL: &str = "abnormal";
pub const SENSOR_STATUS_OVER_THRESHOLD: &str = "over-threshold";
pub const SENSOR_STATUS_OFFLINE: &str = "offline";

/// True for statuses that count toward the abnormal-sensor rule.
pub fn is_out_of_range(status: &str) -> bool {
    status == SENSOR_STATUS_ABNORMAL || status == SENSOR_STATUS_OVER_THRESHOLD
}

/// A physical place. District + street is the grouping key used by the
/// detection rules; coordinates are carried through for map consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub district: District,
    pub street: Street,
    pub lat: f64,
    pub lng: f64,
}

/// A citizen- or staff-reported incident. Read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub location: Location,
    pub report_time: DateTime<Utc>,
    pub reporter_type: String,
    pub status: String,
}

/// One timestamped measurement from a fixed sensor. Read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorData {
    pub sensor_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: Location,
    pub value: f64,
    pub unit: String,
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

/// Point-in-time view of the city handed over by the data provider.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub events: Vec<CityEvent>,
    pub sensors: Vec<SensorData>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.sensors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_statuses() {
        assert!(is_out_of_range(SENSOR_STATUS_ABNORMAL));
        assert!(is_out_of_range(SENSOR_STATUS_OVER_THRESHOLD));
        assert!(!is_out_of_range(SENSOR_STATUS_NORMAL));
        assert!(!is_out_of_range(SENSOR_STATUS_OFFLINE));
    }

    #[test]
    fn test_event_wire_names() {
        let json = r#"{
            "id": "evt_1",
            "type": "flooding",
            "description": "standing water",
            "location": {"district": "Riverside", "street": "Main", "lat": 31.2, "lng": 121.4},
            "reportTime": "2025-06-01T08:00:00Z",
            "reporterType": "citizen",
            "status": "open"
        }"#;
        let event: CityEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, "flooding");
        assert_eq!(event.location.street, "Main");
    }

    #[test]
    fn test_snapshot_empty() {
        assert!(Snapshot::default().is_empty());
        let snap = Snapshot {
            events: Vec::new(),
            sensors: vec![SensorData {
                sensor_id: "s1".to_string(),
                kind: "pm25".to_string(),
                location: Location {
                    district: "Riverside".to_string(),
                    street: "Main".to_string(),
                    lat: 0.0,
                    lng: 0.0,
                },
                value: 10.0,
                unit: "ug/m3".to_string(),
                threshold: 75.0,
                timestamp: Utc::now(),
                status: SENSOR_STATUS_NORMAL.to_string(),
            }],
        };
        assert!(!snap.is_empty());
    }
}
