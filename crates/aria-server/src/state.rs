//! Shared application state.

use aria_core::AriaConfig;
use aria_runtime::Assistant;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: AriaConfig,
    pub assistant: Assistant,
}

impl AppState {
    pub fn new(config: AriaConfig, assistant: Assistant) -> Self {
        Self { config, assistant }
    }
}
