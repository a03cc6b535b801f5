#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// The ultimate strictness: catches things like missing documentation or overflow risks
#![warn(clippy::restriction)]
pub mod core;

pub use self::core::alerts::model::{Alert, AlertKind, AlertStatistics, AlertStatus, Severity};
pub use self::core::alerts::store::{AlertStore, JsonFileBackend, MemoryBackend};
pub use self::core::config::{ConfigManager, Settings};
pub use self::core::error::CoreError;
pub use self::core::model::{CityEvent, Location, SensorData, Snapshot};
pub use self::core::provider::{DataProvider, LogNotifier, NotificationSink};
pub use self::core::scheduler::AlertScheduler;
