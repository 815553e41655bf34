//! Host documents and the token stream produced by the markup parser.

pub(crate) mod model;
pub mod parser;
pub mod token;

// Re-export main types
pub use model::{HostDocument, TextDocument};
pub use parser::{DocumentParser, FenceParser};
pub use token::{LanguageBlock, LineRange, Token};
