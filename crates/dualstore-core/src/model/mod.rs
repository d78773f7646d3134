pub mod document;
pub mod options;
pub mod record;

pub use document::{document_from_record, document_from_records, records_from_document};
pub use options::Options;
pub use record::{Attributes, Record, RecordReference, RecordState};
