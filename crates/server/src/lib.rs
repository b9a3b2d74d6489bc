pub mod error;
pub mod routes;
pub mod session;

use axum::Router;
use db::DBService;
use services::services::config::Config;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    db: DBService,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DBService, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(routes::auth::router())
                .merge(routes::cart::router())
                .merge(routes::wishlist::router())
                .merge(routes::products::router())
                .merge(routes::brands::router())
                .merge(routes::collections::router())
                .merge(routes::orders::router())
                .merge(routes::profile::router())
                .merge(routes::merchant::router())
                .merge(routes::admin::router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
