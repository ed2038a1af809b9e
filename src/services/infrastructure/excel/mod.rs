//! Excel台账读写

pub mod excel_importer;
pub mod excel_writer;

pub use excel_importer::ExcelImporter;
pub use excel_writer::ExcelWriter;
