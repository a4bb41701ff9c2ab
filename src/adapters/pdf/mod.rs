//! PDF adapters - implementation of the PdfExtractor port.

mod extract_text;

pub use extract_text::PdfTextExtractor;
