//! Utilities (bill file reading, PDF text extraction).

pub mod document;
pub mod pdf;
