//! solde-ingest: page content extraction, from raw PDF streams to text lines.

pub mod decode;
pub mod document;
pub mod graph;
pub mod lines;
pub mod page;
pub mod tokenizer;

pub use decode::{DecodedStream, Filter, decode_stream};
pub use document::{PdfDocument, PdfNode};
pub use graph::{GraphNode, NodeKind, PageSource, walk};
pub use lines::{Fragment, Line, reconstruct_lines};
pub use page::{is_text_stream, page_lines};
pub use tokenizer::{tokenize, tokenize_reader};
