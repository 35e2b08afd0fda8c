pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::prompting::handlers as prompting;
use crate::resources::handlers as resources;
use crate::settings::handlers as settings;
use crate::state::AppState;
use crate::tones::handlers as tones;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // External services
        .route(
            "/api/v1/services/urls",
            get(resources::handle_get_service_urls),
        )
        .route(
            "/api/v1/services/urls/:name",
            get(resources::handle_get_service_url),
        )
        .route(
            "/api/v1/services/urls/:name/refresh",
            post(resources::handle_refresh_service_url),
        )
        .route(
            "/api/v1/services/generate-prompt",
            post(prompting::handle_generate_prompt),
        )
        // Tones
        .route(
            "/api/v1/tones",
            get(tones::handle_list_tones).post(tones::handle_create_tone),
        )
        .route("/api/v1/tones/presets", get(tones::handle_list_presets))
        .route(
            "/api/v1/tones/:id",
            put(tones::handle_update_tone).delete(tones::handle_delete_tone),
        )
        // User settings
        .route(
            "/api/v1/user-settings",
            get(settings::handle_get_settings)
                .put(settings::handle_put_settings)
                .delete(settings::handle_delete_settings),
        )
        // Analytics
        .route("/api/v1/replies", post(analytics::handle_log_reply))
        .route("/api/v1/replies/count", get(analytics::handle_reply_count))
        .route("/api/v1/replies/stats", get(analytics::handle_reply_stats))
        .route("/api/v1/replies/recent", get(analytics::handle_recent_replies))
        .route("/api/v1/replies/:id", delete(analytics::handle_delete_reply))
        .with_state(state)
}
