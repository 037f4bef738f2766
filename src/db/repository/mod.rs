pub mod note;
pub mod patient;
pub mod patient_file;
pub mod summary;

pub use note::*;
pub use patient::*;
pub use patient_file::*;
pub use summary::*;

use uuid::Uuid;

/// Read a TEXT column as a UUID. A corrupt stored id is a conversion error,
/// never a silent nil id.
pub(crate) fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> Result<Uuid, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
