//! Utility modules.

pub mod cancel;
pub mod file;

pub use cancel::CancellationToken;
pub use file::{TEXT_EXTENSIONS, is_excluded, is_text_file};
