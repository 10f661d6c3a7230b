pub mod comment;
pub mod photo;
pub mod social;
pub mod user;
pub mod validate;

pub use validate::{FieldError, Validate};

use serde::Serialize;

/// Fixed confirmation body returned by the delete routes
#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub error: bool,
    pub message: &'static str,
}

impl Confirmation {
    pub fn new(message: &'static str) -> Self {
        Self { error: false, message }
    }
}
