use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::auth::{require_bearer_token, require_signed_in, ServerState};

pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod prices;
pub mod studio;
pub mod templates;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: public auth routes, account routes
/// for any signed-in user, and `/api` routes that also require access.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let account = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/password", post(auth::change_password))
        .route("/auth/subscription", post(auth::activate_subscription).delete(auth::cancel_subscription))
        .route("/auth/account", delete(auth::delete_account))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_signed_in));

    let api = Router::new()
        .route("/api/clients", get(clients::list).post(clients::create))
        .route("/api/clients/search", get(clients::search))
        .route("/api/clients/:id", get(clients::get).put(clients::update).delete(clients::remove))
        .route("/api/appointments", get(appointments::list).post(appointments::create))
        .route(
            "/api/appointments/:id",
            get(appointments::get).put(appointments::update).delete(appointments::remove),
        )
        .route("/api/appointments/:id/status", post(appointments::set_status))
        .route("/api/calendar/day/:date", get(appointments::day))
        .route("/api/calendar/month/:year/:month", get(appointments::month))
        .route("/api/reminders", get(appointments::reminders))
        .route("/api/catalog/folders", get(catalog::list_folders).post(catalog::create_folder))
        .route("/api/catalog/folders/:id", get(catalog::get_folder).put(catalog::rename_folder).delete(catalog::delete_folder))
        .route("/api/catalog/folders/:id/images", get(catalog::list_images).post(catalog::add_image))
        .route("/api/catalog/images", get(catalog::find_by_tag))
        .route("/api/catalog/images/:id", delete(catalog::remove_image))
        .route("/api/catalog/images/:id/move", post(catalog::move_image))
        .route("/api/prices/categories", get(prices::list_categories).post(prices::create_category))
        .route("/api/prices/categories/:id", axum::routing::put(prices::rename_category).delete(prices::delete_category))
        .route("/api/prices/categories/:id/items", get(prices::list_items).post(prices::create_item))
        .route("/api/prices/items/:id", axum::routing::put(prices::update_item).delete(prices::delete_item))
        .route("/api/quote", post(prices::calculate_quote))
        .route("/api/templates", get(templates::list).post(templates::create))
        .route("/api/templates/:id", get(templates::get).put(templates::update).delete(templates::remove))
        .route("/api/templates/:id/channels", post(templates::set_channel))
        .route("/api/templates/:id/render/:appointment_id", post(templates::render))
        .route("/api/studio", get(studio::get).put(studio::update))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token));

    public
        .merge(account)
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
