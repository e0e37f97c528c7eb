use std::sync::Arc;

use super::{config::Config, storage::Storage};

pub struct State {
    pub config: Config,
    pub storage: Storage,
}

impl State {
    pub fn new() -> Arc<Self> {
        Self::from_config(Config::load())
    }

    pub fn from_config(config: Config) -> Arc<Self> {
        let storage = Storage::new(&config);

        Arc::new(Self { config, storage })
    }
}
