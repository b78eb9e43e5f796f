use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::ErrorResponse;

use crate::database::contacts as contacts_db;
use crate::database::AsyncDbConnection;

pub async fn get_contact(
    db_conn: web::Data<AsyncDbConnection>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();

    let contact = contacts_db::get_contact(db_conn.as_ref().clone(), contact_id)
        .await
        .map_err(|e| actix_web::error::ErrorServiceUnavailable(e.to_string()))?;

    match contact {
        Some(contact) => Ok(HttpResponse::Ok().json(contact)),
        None => Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: format!("Contact {} not found", contact_id),
        })),
    }
}
