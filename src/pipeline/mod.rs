pub mod extraction;

pub use extraction::*;

use thiserror::Error;

use crate::ai::AiError;
use crate::db::DatabaseError;

/// Failures of the image-to-record pipeline, ordered by stage.
///
/// `UnparseableResponse` and `Storage` stay distinct so callers can tell a
/// model that answered garbage apart from a database that refused the commit.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("No image selected")]
    EmptyFilename,

    #[error("AI model call failed: {0}")]
    Model(#[from] AiError),

    #[error("Could not parse JSON from model response: {0}")]
    UnparseableResponse(String),

    #[error("Error saving to database: {0}")]
    Storage(#[from] DatabaseError),
}
