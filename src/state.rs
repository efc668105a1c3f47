use std::sync::Arc;

use crate::{
    config::Config,
    database::{init_redis, RedisStore},
    store::RsvpStore,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RsvpStore>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();
        let connection = init_redis(&config.redis_url).await;

        Arc::new(Self {
            config,
            store: Arc::new(RedisStore::new(connection)),
        })
    }

    /// State over an injected store, used by the API tests.
    pub fn with_store(config: Config, store: Arc<dyn RsvpStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
