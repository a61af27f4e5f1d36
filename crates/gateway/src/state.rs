use std::sync::Arc;
use std::time::Instant;

use rd_domain::config::Config;

use crate::reply::ReplyGenerator;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub replies: Arc<ReplyGenerator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<Config>, replies: Arc<ReplyGenerator>) -> Self {
        Self {
            config,
            replies,
            started_at: Instant::now(),
        }
    }
}
