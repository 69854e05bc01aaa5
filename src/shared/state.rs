use std::sync::Arc;
use crate::system::config::AppConfig;
use crate::system::locale::LocaleResolver;

/// Global shared state containing system-level dependencies
#[derive(Debug, Clone)]
pub struct SharedState {
    pub config: Arc<AppConfig>,
    pub resolver: Arc<LocaleResolver>,
}
