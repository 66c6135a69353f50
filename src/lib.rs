//! # locfile-reader
//!
//! A reader for legacy Mozilla-style localization source files: the
//! `.properties` key/value format and the `.dtd` entity-declaration format.
//!
//! Each source file is converted into an ordered list of typed
//! [`ContentNode`](locfile::models::ContentNode)s that preserve file order,
//! comment semantics (plain comments, localization notes, license headers),
//! and entity declarations, so that downstream consumers can reassemble
//! files losslessly and link translated counterparts by name.
pub mod locfile;

// Re-export the main types for convenience
pub use locfile::{
    error::{ParseError, Result},
    format::{Dtd, FileFormat, Properties, SourceFormat},
    models::{CommentKind, ContentNode, NodeKind},
};
