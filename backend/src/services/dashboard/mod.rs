//! Dashboard overview counters: `GET /api/dashboard/stats`.

use crate::error::AppError;
use crate::store::Store;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};

const API_PATH: &str = "/api/dashboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/stats", get().to(stats))
}

async fn stats(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let store = store.get_ref().clone();
    let stats = web::block(move || store.stats()).await??;
    Ok(HttpResponse::Ok().json(stats))
}
