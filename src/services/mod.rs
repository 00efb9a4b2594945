//! Business logic services

pub mod auth;
pub mod batch;
pub mod catalog;
pub mod circulation;
pub mod media;
pub mod readers;
pub mod reviews;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub readers: readers::ReadersService,
    pub circulation: circulation::CirculationService,
    pub reviews: reviews::ReviewsService,
    pub batch: batch::BatchService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let media = media::MediaService::new(config.media.root.clone());
        let media_url = config.media.url.clone();

        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), media.clone(), media_url.clone()),
            readers: readers::ReadersService::new(repository.clone(), media, media_url),
            circulation: circulation::CirculationService::new(repository.clone()),
            reviews: reviews::ReviewsService::new(repository.clone()),
            batch: batch::BatchService::new(repository.clone()),
            repository,
        }
    }

    /// Database round-trip for the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
