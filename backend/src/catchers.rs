use rocket::{Request, catch, serde::json::Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorMessage {
    success: bool,
    error: String,
    status: u16,
}

impl ErrorMessage {
    fn new(error: &str, status: u16) -> Json<Self> {
        Json(Self {
            success: false,
            error: error.into(),
            status,
        })
    }
}

#[catch(404)]
pub fn not_found(req: &Request) -> Json<ErrorMessage> {
    let error_msg = match req.uri().path().segments().next() {
        Some("votes") => "Expected /votes/<site> or /votes/<site>/<vote>.",
        _ => "The requested resource was not found.",
    };
    ErrorMessage::new(error_msg, 404)
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> Json<ErrorMessage> {
    ErrorMessage::new("Invalid request parameters.", 422)
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorMessage> {
    ErrorMessage::new("An internal server error occurred.", 500)
}
