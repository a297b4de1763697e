use storage::Database;

use crate::middleware::auth::WorkerKeys;
use crate::notify::Notifier;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub worker_keys: WorkerKeys,
    pub notifier: Notifier,
}
