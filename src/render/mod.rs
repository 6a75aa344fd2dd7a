//! Output rendering (JSON, flag lines)

pub mod flags;
pub mod json;

pub use flags::render_flags;
pub use json::render_json;
