//! HTML parsing and serialization for the document model.

pub mod html;
pub mod serialize;

pub use serialize::{inner_html, outer_html, serialize_document};
