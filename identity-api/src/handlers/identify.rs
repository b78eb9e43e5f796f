use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use shared_types::{ErrorResponse, IdentifyRequest};

use crate::identity::{ConsolidationEngine, IdentifyError};

pub async fn identify(
    engine: web::Data<ConsolidationEngine>,
    request: web::Json<IdentifyRequest>,
) -> Result<HttpResponse, IdentifyError> {
    let response = engine.identify(request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

impl ResponseError for IdentifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            IdentifyError::Validation(_) => StatusCode::BAD_REQUEST,
            IdentifyError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            IdentifyError::IntegrityViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            IdentifyError::Validation(_) => self.to_string(),
            IdentifyError::Store(_) => {
                tracing::error!("Identify failed: {}", self);
                "Contact store unavailable, retry the request".to_string()
            }
            IdentifyError::IntegrityViolation(_) => {
                tracing::error!("Identify failed: {}", self);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error })
    }
}
