use std::sync::Arc;

use crate::core::league::LeagueService;
use crate::core::LeagueRepository;

#[derive(Debug)]
pub struct AppState {
    pub league: LeagueService,
}

impl AppState {
    pub fn new(repository: Arc<dyn LeagueRepository>) -> Arc<Self> {
        Arc::new(Self {
            league: LeagueService::new(repository),
        })
    }
}
