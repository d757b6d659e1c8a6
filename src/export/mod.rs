pub mod format;
pub mod writer;
