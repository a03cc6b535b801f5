//! Seams to the core's external collaborators: the data provider that owns
//! events/sensors, and the notification side channel.

use super::alerts::model::Alert;
use super::error::CoreError;
use super::model::Snapshot;

/// Source of current events and sensor readings. The provider owns the data
/// entirely; the core only ever asks for a snapshot.
///
/// `snapshot()` is synchronous from the core's perspective - any remote
/// fetching or caching happens on the provider's side of the seam.
pub trait DataProvider: Send + Sync {
    fn snapshot(&self) -> Result<Snapshot, CoreError>;
}

/// Fire-and-forget delivery of a freshly persisted alert. Best-effort; the
/// core never consumes a return value.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, alert: &Alert);
}

/// Default sink: one log line per alert.
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, alert: &Alert) {
        log::info!("alert notification: [{}] {}", alert.level.as_str(), alert.title);
    }
}
