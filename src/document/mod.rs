//! Document assembly: record in, fixed three-page document model out.

pub mod assembler;
pub mod export;
pub mod format;
pub mod model;

pub use assembler::assemble;
pub use export::{check_export, export_document, ExportError, ExportStatus};
pub use model::{ItineraryDocument, Page, PageSection};
