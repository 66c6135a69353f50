//! Format selection for localization source files (.properties vs .dtd).
//!
//! This layer carries no parsing logic itself. Callers depend on one
//! `parse` contract regardless of file type, so a third format (or a
//! purpose-built DTD tokenizer replacing the scaffolding trick) is an
//! additive change that never touches call sites.

use std::io::BufRead;
use std::path::Path;

use super::dtd;
use super::error::Result;
use super::models::ContentNode;
use super::properties;

/// A trait that defines parsing behavior for a specific source file format.
pub trait SourceFormat {
    /// A short name used for debugging and logging.
    const DEBUG_NAME: &'static str;

    /// Parse one already-decoded source stream into ordered content nodes.
    ///
    /// The stream must be positioned at the start of the file and decoded
    /// to characters by the caller; encoding selection is not this
    /// crate's responsibility.
    fn parse<R: BufRead>(reader: R) -> Result<Vec<ContentNode>>;

    /// Parse source text already held in memory.
    fn parse_str(text: &str) -> Result<Vec<ContentNode>> {
        Self::parse(text.as_bytes())
    }
}

/// Zero-cost marker struct for `.properties` files.
#[derive(Debug, Clone, Copy)]
pub struct Properties;

impl SourceFormat for Properties {
    const DEBUG_NAME: &'static str = "properties";

    fn parse<R: BufRead>(reader: R) -> Result<Vec<ContentNode>> {
        properties::parse(reader)
    }
}

/// Zero-cost marker struct for `.dtd` files.
#[derive(Debug, Clone, Copy)]
pub struct Dtd;

impl SourceFormat for Dtd {
    const DEBUG_NAME: &'static str = "dtd";

    fn parse<R: BufRead>(reader: R) -> Result<Vec<ContentNode>> {
        dtd::parse(reader)
    }
}

/// Source file format, detectable from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Properties,
    Dtd,
}

impl FileFormat {
    /// Detect the format from a path's extension, if it is a known one.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "properties" => Some(Self::Properties),
            "dtd" => Some(Self::Dtd),
            _ => None,
        }
    }

    pub fn debug_name(self) -> &'static str {
        match self {
            Self::Properties => Properties::DEBUG_NAME,
            Self::Dtd => Dtd::DEBUG_NAME,
        }
    }

    /// Parse one source stream with the parser for this format.
    pub fn parse<R: BufRead>(self, reader: R) -> Result<Vec<ContentNode>> {
        match self {
            Self::Properties => Properties::parse(reader),
            Self::Dtd => Dtd::parse(reader),
        }
    }

    /// Parse source text already held in memory.
    pub fn parse_str(self, text: &str) -> Result<Vec<ContentNode>> {
        self.parse(text.as_bytes())
    }
}
