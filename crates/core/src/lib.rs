pub mod chunk;
pub mod config;
pub mod document;
pub mod error;
pub mod interval;
pub mod relation;
pub mod text;

pub use chunk::*;
pub use config::EngineConfig;
pub use document::*;
pub use error::*;
pub use interval::CharSpan;
pub use relation::*;
pub use text::{sha256_hex, DocumentText};
