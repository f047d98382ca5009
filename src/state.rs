use std::sync::Arc;

use crate::config::Config;
use crate::ws::Hub;

/// State shared by every route: one hub per process, created at startup.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            hub: Arc::new(Hub::new(config.outbound_queue_capacity)),
            config: Arc::new(config),
        }
    }
}
