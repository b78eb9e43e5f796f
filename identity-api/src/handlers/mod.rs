pub mod contacts;
pub mod identify;

use actix_web::{error, web, HttpRequest, HttpResponse};
use shared_types::ErrorResponse;

/// Registers every route of the service. Shared by the binary and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .route("/identify", web::post().to(identify::identify))
        .route("/contacts/{id}", web::get().to(contacts::get_contact));
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Identity Reconciliation Service"
    }))
}

async fn health(db: web::Data<crate::database::AsyncDbConnection>) -> HttpResponse {
    let ping = match db.lock().await {
        Ok(conn) => conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match ping {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

/// Malformed request bodies get the same JSON error shape as every other failure.
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let message = err.to_string();
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ErrorResponse { error: message }),
    )
    .into()
}
