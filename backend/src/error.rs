use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::models::PercentResponse;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Vote store unavailable")]
    StoreUnavailable,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = match self {
            ApiError::StoreUnavailable => Status::InternalServerError,
        };
        error!("{} {} failed: {}", req.method(), req.uri(), self);

        rocket::Response::build_from(Json(PercentResponse::failure()).respond_to(req)?)
            .status(status)
            .ok()
    }
}
