//! Application state shared across handlers.

use carton_core::Config;
use carton_engine::{ActionEngine, UploadCoordinator};

/// Everything the handlers need: configuration and the two engine
/// subsystems, each holding its own handle to the shared store.
pub struct AppState {
    pub config: Config,
    pub coordinator: UploadCoordinator,
    pub engine: ActionEngine,
}
