//! Core localization source parsing module

pub mod classify;
pub mod dtd;
pub mod error;
pub mod format;
pub mod models;
pub mod properties;

pub use error::{ParseError, Result};
pub use format::{Dtd, FileFormat, Properties, SourceFormat};
pub use models::{CommentKind, ContentNode, NodeKind};
