//! Canned remediation text the rule engine attaches to alerts.
//!
//! The tables are data, not logic: operators can extend or override them
//! through `Settings` without code changes. Values may contain a
//! `{district}` placeholder filled in at generation time.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref DEFAULT_EVENT_SUGGESTIONS: HashMap<String, String> = {
        let mut m = HashMap::new();
        m.insert(
            "flooding".to_string(),
            "Dispatch a drainage crew to {district} for emergency pumping and check the \
             capacity of the local storm drains. Coordinate with traffic management to close \
             affected lanes until the water recedes."
                .to_string(),
        );
        m.insert(
            "streetlight-outage".to_string(),
            "Send an electrical maintenance team to {district} to inspect the supply circuit \
             and the fixtures. Set up temporary lighting if repairs will run past nightfall."
                .to_string(),
        );
        m.insert(
            "trash-overflow".to_string(),
            "Route additional collection trucks to {district} for an unscheduled pickup and \
             review whether bin capacity in the area is adequate. Increase patrol frequency."
                .to_string(),
        );
        m.insert(
            "noise".to_string(),
            "Have environmental enforcement take readings on site in {district} and apply \
             noise-control measures where the source can be identified."
                .to_string(),
        );
        m.insert(
            "air-quality".to_string(),
            "Activate the air pollution response plan and step up checks on emission sources \
             around {district}. Advise residents to limit outdoor activity."
                .to_string(),
        );
        m
    };
    static ref DEFAULT_SENSOR_SUGGESTIONS: HashMap<String, String> = {
        let mut m = HashMap::new();
        m.insert(
            "water-level".to_string(),
            "Start the drainage contingency plan and send pump trucks to {district}. Place \
             warning signs, divert traffic, and verify the drainage works are operating."
                .to_string(),
        );
        m.insert(
            "pm25".to_string(),
            "Trigger the heavy-pollution response for {district} and tighten controls on \
             nearby emission sources. Consider traffic restrictions to cut vehicle exhaust."
                .to_string(),
        );
        m.insert(
            "noise".to_string(),
            "Send environmental inspectors to {district} to locate and sanction the noise \
             source. Apply mitigation if residents are affected overnight."
                .to_string(),
        );
        m.insert(
            "streetlight-current".to_string(),
            "Dispatch electrical maintenance to {district} immediately to inspect the \
             circuit for shorts or failing equipment before it becomes a safety hazard."
                .to_string(),
        );
        m
    };
}

fn default_event_suggestions() -> HashMap<String, String> {
    DEFAULT_EVENT_SUGGESTIONS.clone()
}

fn default_sensor_suggestions() -> HashMap<String, String> {
    DEFAULT_SENSOR_SUGGESTIONS.clone()
}

/// Lookup tables keyed by event type and sensor type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionTables {
    #[serde(default = "default_event_suggestions")]
    pub events: HashMap<String, String>,
    #[serde(default = "default_sensor_suggestions")]
    pub sensors: HashMap<String, String>,
}

impl Default for SuggestionTables {
    fn default() -> Self {
        Self {
            events: default_event_suggestions(),
            sensors: default_sensor_suggestions(),
        }
    }
}

impl SuggestionTables {
    /// Suggestion for a cluster alert. Unrecognized event types fall back to
    /// a generic dispatch-and-investigate line.
    pub fn event_suggestion(&self, event_kind: &str, district: &str) -> String {
        match self.events.get(event_kind) {
            Some(template) => render(template, district),
            None => format!(
                "Dispatch crews to {district} to investigate on site and take whatever \
                 measures are needed to resolve the reported problem promptly."
            ),
        }
    }

    /// Suggestion for an abnormal-sensor alert. Unrecognized sensor types
    /// fall back to a generic message naming the peak observed value.
    pub fn sensor_suggestion(&self, sensor_kind: &str, district: &str, peak_value: f64) -> String {
        match self.sensors.get(sensor_kind) {
            Some(template) => render(template, district),
            None => format!(
                "Send a technician to {district} to inspect the {sensor_kind} sensor; a peak \
                 reading of {peak_value} may indicate equipment failure or a real anomaly."
            ),
        }
    }
}

fn render(template: &str, district: &str) -> String {
    template.replace("{district}", district)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_event_type_renders_district() {
        let tables = SuggestionTables::default();
        let text = tables.event_suggestion("flooding", "Riverside");
        assert!(text.contains("Riverside"));
        assert!(!text.contains("{district}"));
    }

    #[test]
    fn test_unknown_event_type_falls_back() {
        let tables = SuggestionTables::default();
        let text = tables.event_suggestion("pothole", "Riverside");
        assert!(text.contains("Riverside"));
        assert!(text.contains("investigate"));
    }

    #[test]
    fn test_unknown_sensor_type_names_peak() {
        let tables = SuggestionTables::default();
        let text = tables.sensor_suggestion("vibration", "Old Town", 42.5);
        assert!(text.contains("42.5"));
        assert!(text.contains("vibration"));
    }

    #[test]
    fn test_operator_override_wins() {
        let mut tables = SuggestionTables::default();
        tables
            .events
            .insert("flooding".to_string(), "Call {district} dispatch.".to_string());
        assert_eq!(
            tables.event_suggestion("flooding", "Riverside"),
            "Call Riverside dispatch."
        );
    }
}
