pub mod archive_writer;
pub mod result_parser;

pub use archive_writer::ArchiveWriter;
pub use result_parser::ResultLineParser;
