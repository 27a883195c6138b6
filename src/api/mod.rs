pub mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::store::TripRegistry;

pub use handlers::*;

/// 共享状态: 行程注册表 + 输出精度
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<TripRegistry>,
    pub scale: i64,
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    // 无状态计算路由
    let rateio_routes = Router::new()
        .route("/api/rateio/totals", post(handlers::trip_totals))
        .route("/api/rateio/calculate", post(handlers::calculate))
        .route("/api/rateio/batch", post(handlers::batch_calculate));

    // 行程会话路由 (每次修改全量重算)
    let trip_routes = Router::new()
        .route("/api/trips", post(handlers::create_trip))
        .route(
            "/api/trips/:trip",
            get(handlers::get_trip).delete(handlers::delete_trip),
        )
        .route("/api/trips/:trip/header", put(handlers::update_header))
        .route("/api/trips/:trip/invoices", post(handlers::add_invoice))
        .route("/api/trips/:trip/import", post(handlers::import_invoices))
        .route(
            "/api/trips/:trip/invoices/:invoice",
            delete(handlers::remove_invoice),
        )
        .route("/api/trips/:trip/report.csv", get(handlers::export_csv));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(rateio_routes)
        .merge(trip_routes)
        .layer(ServiceBuilder::new())
        .with_state(state)
}
