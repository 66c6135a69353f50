//! Data structures representing parsed localization file content

use std::time::SystemTime;

/// Fixed node name shared by all recognized license header blocks.
///
/// License headers have no natural key; downstream consumers rely on this
/// literal to exclude the block from translation.
pub const LICENSE_NODE_NAME: &str = "LTLicenseHeader";

/// Subtype of a comment node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentKind {
    /// An ordinary comment with no special meaning.
    General,
    /// A translator-guidance comment following the `LOCALIZATION NOTE`
    /// convention.
    ///
    /// `entity` is the key the note refers to, populated only when the
    /// note text matches the extraction pattern; `None` is a valid state,
    /// not an error.
    LocalizationNote { entity: Option<String> },
}

/// The classified variant of a content node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// One key/value pair: a `key=value` properties line or an internal
    /// DTD entity declaration.
    KeyValue,
    /// A comment block.
    Comment(CommentKind),
    /// A comment block that matched a license-header signature.
    /// Structurally a comment, tagged distinctly so it is never offered
    /// for translation.
    License,
    /// A DTD external entity declaration.
    ExternalEntity {
        /// Public identifier, kept in memory only; never persisted.
        public_id: Option<String>,
        system_id: String,
    },
}

/// One classified unit of parsed file content.
///
/// Nodes are created during a single parse call, appended to the output
/// list in emission order, and never mutated after the call returns.
#[derive(Debug, Clone)]
pub struct ContentNode {
    /// Stable identifier: the literal key for key/value pairs, the
    /// declared name for entities, a synthesized `-comment@line-<n>` for
    /// comments, or [`LICENSE_NODE_NAME`] for license headers.
    pub name: String,
    /// Zero-based emission order within one parse call. Strictly
    /// increasing and unique, but not a physical line number: the DTD
    /// parser counts emitted declarations and comments, not text lines.
    pub order_in_file: u32,
    pub created: SystemTime,
    pub last_update: SystemTime,
    /// The decoded payload: the value text for key/value pairs, the
    /// accumulated comment text, or the system id for external entities.
    pub text_value: String,
    pub kind: NodeKind,
}

impl ContentNode {
    pub(crate) fn key_value(order: u32, name: String, value: String) -> Self {
        Self::new(order, name, value, NodeKind::KeyValue)
    }

    pub(crate) fn comment(order: u32, kind: CommentKind, text: &str) -> Self {
        Self::new(
            order,
            format!("-comment@line-{order}"),
            text.to_string(),
            NodeKind::Comment(kind),
        )
    }

    pub(crate) fn license(order: u32, text: &str) -> Self {
        Self::new(
            order,
            LICENSE_NODE_NAME.to_string(),
            text.to_string(),
            NodeKind::License,
        )
    }

    pub(crate) fn external_entity(
        order: u32,
        name: String,
        public_id: Option<String>,
        system_id: String,
    ) -> Self {
        Self::new(
            order,
            name,
            system_id.clone(),
            NodeKind::ExternalEntity { public_id, system_id },
        )
    }

    fn new(order: u32, name: String, text_value: String, kind: NodeKind) -> Self {
        let now = SystemTime::now();
        Self {
            name,
            order_in_file: order,
            created: now,
            last_update: now,
            text_value,
            kind,
        }
    }

    /// Retags a comment node as a license header in place, keeping the
    /// order, timestamps, and text accumulated so far.
    pub(crate) fn relabel_as_license(&mut self) {
        self.name = LICENSE_NODE_NAME.to_string();
        self.kind = NodeKind::License;
    }

    /// Structural equality ignoring the creation/update timestamps.
    ///
    /// Two parses of identical content produce lists that are equal under
    /// this comparison even though they ran at different times.
    pub fn same_content(&self, other: &ContentNode) -> bool {
        self.name == other.name
            && self.order_in_file == other.order_in_file
            && self.text_value == other.text_value
            && self.kind == other.kind
    }
}
