//! Document ingestion: loading, multi-format parsing and chunking

mod chunker;
mod loader;
mod parser;

pub use chunker::TextChunker;
pub use loader::{DocumentLoader, IMAGE_TRANSCRIBE_INSTRUCTION};
pub use parser::{FileParser, ParseFailure, ParserStrategy};
