use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::format::ResponseFormat;
use crate::auth::Authenticator;
use crate::config::AppConfig;
use crate::database::{DatabaseError, StudentStore};
use crate::error::ApiError;
use crate::handlers;
use crate::handlers::public::method_not_allowed;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub auth: Authenticator,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, config: AppConfig) -> Self {
        let auth = Authenticator::new(&config.security);
        Self {
            store,
            auth,
            config: Arc::new(config),
        }
    }

    /// Resolve the `format` query parameter under the deployment's policy.
    pub fn negotiate(&self, requested: Option<&str>) -> Result<ResponseFormat, ApiError> {
        ResponseFormat::negotiate(requested, self.config.api.format_policy)
    }

    /// Log a store failure and turn it into a 500.
    pub fn store_error(&self, err: DatabaseError) -> ApiError {
        tracing::error!("Record store error: {}", err);
        ApiError::store(err, self.config.api.expose_error_details)
    }
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        // Public
        .route("/", get(handlers::public::root).fallback(method_not_allowed))
        .route("/health", get(handlers::public::health).fallback(method_not_allowed))
        .merge(auth_public_routes())
        .merge(student_routes())
        .fallback(handlers::public::not_found)
        .with_state(state);

    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new().route(
        "/auth/login",
        post(auth::login_post).fallback(method_not_allowed),
    )
}

fn student_routes() -> Router<AppState> {
    use handlers::{protected, public};

    // Reads are public; writes extract an `AuthUser` before touching the body.
    // Unlisted methods answer 405 in the JSON error shape.
    Router::new()
        .route(
            "/students",
            get(public::students::list)
                .post(protected::students::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/students/search",
            get(public::students::search).fallback(method_not_allowed),
        )
        .route(
            "/students/:id",
            get(public::students::show)
                .put(protected::students::update)
                .delete(protected::students::delete)
                .fallback(method_not_allowed),
        )
}
