// End-to-end walk through the flooding escalation scenario: a cluster alert
// fires at five reports, and the later high-severity candidate for the same
// place is treated as a repeat regardless of severity.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use super::alerts::model::{Alert, AlertKind, Severity};
use super::alerts::store::{AlertStore, MemoryBackend};
use super::config::Settings;
use super::error::CoreError;
use super::model::{CityEvent, Location, Snapshot};
use super::provider::{DataProvider, NotificationSink};
use super::scheduler::AlertScheduler;

struct FixedProvider {
    snapshot: Mutex<Snapshot>,
}

impl DataProvider for FixedProvider {
    fn snapshot(&self) -> Result<Snapshot, CoreError> {
        Ok(self.snapshot.lock().unwrap().clone())
    }
}

struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify(&self, _alert: &Alert) {}
}

fn flooding_events(count: usize) -> Vec<CityEvent> {
    // All reported within the last 30 minutes.
    (0..count)
        .map(|i| CityEvent {
            id: format!("evt_{i}"),
            kind: "flooding".to_string(),
            description: "standing water on the roadway".to_string(),
            location: Location {
                district: "Riverside".to_string(),
                street: "Main".to_string(),
                lat: 31.23,
                lng: 121.47,
            },
            report_time: Utc::now() - Duration::minutes((i % 30) as i64),
            reporter_type: "citizen".to_string(),
            status: "open".to_string(),
        })
        .collect()
}

#[test]
fn test_flooding_escalation_is_deduplicated() {
    let provider = Arc::new(FixedProvider {
        snapshot: Mutex::new(Snapshot {
            events: flooding_events(5),
            sensors: Vec::new(),
        }),
    });
    let store = Arc::new(Mutex::new(
        AlertStore::new(Box::<MemoryBackend>::default()).unwrap(),
    ));
    let scheduler = Arc::new(AlertScheduler::new(
        provider.clone(),
        store.clone(),
        Arc::new(SilentSink),
        Settings::default(),
    ));

    // Five reports within the hour: exactly one low-priority cluster alert.
    assert_eq!(scheduler.trigger_manual_check().unwrap(), 1);
    {
        let store = store.lock().unwrap();
        assert_eq!(store.list().len(), 1);
        let alert = &store.list()[0];
        assert_eq!(alert.kind, AlertKind::Cluster);
        assert_eq!(alert.priority, Severity::Low);
        assert_eq!(alert.related_events.len(), 5);
    }

    // Five more reports arrive: the fresh cycle derives a high-priority
    // candidate, but the dedup key ignores severity and suppresses it.
    provider.snapshot.lock().unwrap().events = flooding_events(10);
    assert_eq!(scheduler.trigger_manual_check().unwrap(), 0);

    let store = store.lock().unwrap();
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].priority, Severity::Low);
}
