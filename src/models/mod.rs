pub mod note;
pub mod patient;
pub mod patient_file;
pub mod summary;

pub use note::*;
pub use patient::*;
pub use patient_file::*;
pub use summary::*;
