//! State core for the robot telemetry dashboard.

pub mod dispatcher;
pub mod error;
pub mod queue;
pub mod slices;
pub mod state;
pub mod transport;
pub mod watcher;

pub use dispatcher::{CommandDispatcher, CommandSink, MissingCommandSink, SendRequest};
pub use error::{DashboardError, Result};
pub use queue::{spawn_store, DispatchHandle, DEFAULT_QUEUE_CAPACITY};
pub use state::{fold, reduce, Action, DashboardState, Store};
pub use transport::{parse_robot_url, LiveSession};
pub use watcher::{decode_message, watch_feed, WatchSummary};
