//! Line-oriented state machine for Mozilla-style `.properties` files.
//!
//! The format is a superset of Java properties: `;` is also accepted as a
//! comment prefix, an INI-style `[Section]` header becomes a synthetic
//! key/value pair, and values continue across lines via a trailing
//! backslash. Malformed lines are skipped rather than failing the parse,
//! because historical files are expected to contain occasional cruft and
//! a best-effort partial result is more useful than an abort.

use std::io::BufRead;

use log::{debug, info, trace};

use super::classify;
use super::error::Result;
use super::models::{CommentKind, ContentNode, NodeKind};

/// Machine state between input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between records.
    Null,
    /// Accumulating a possibly multi-line value.
    Value,
    /// Accumulating a plain comment block.
    Comment,
    /// Accumulating a comment block promoted to a localization note.
    LocalizationNote,
    /// Accumulating a comment block promoted to a license header.
    LicenseHeader,
}

/// Parse one `.properties` stream into ordered content nodes.
///
/// # Errors
/// Fails only on I/O errors while reading the stream. Lines with no key
/// delimiter are skipped silently (logged at debug level); there is no
/// syntax-error path for this format.
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<ContentNode>> {
    info!("Parsing properties stream");
    let mut machine = Machine::new();
    for line in reader.lines() {
        machine.feed(&line?);
    }
    let nodes = machine.finish();
    info!("Properties stream parsed: {} nodes", nodes.len());
    Ok(nodes)
}

/// Parse properties source text already held in memory.
pub fn parse_str(text: &str) -> Result<Vec<ContentNode>> {
    parse(text.as_bytes())
}

struct Machine {
    state: State,
    nodes: Vec<ContentNode>,
    next_order: u32,
    /// Key of the value currently being accumulated.
    pending_key: Option<String>,
    /// Decoded value fragments accumulated so far.
    value_buf: String,
    /// Index of the comment node currently receiving continuation lines.
    /// The node is already in `nodes`; continuation lines mutate it in
    /// place, the sole exception to the append-only output list.
    comment_idx: Option<usize>,
}

impl Machine {
    fn new() -> Self {
        Self {
            state: State::Null,
            nodes: Vec::new(),
            next_order: 0,
            pending_key: None,
            value_buf: String::new(),
            comment_idx: None,
        }
    }

    /// Classify and consume one input line.
    fn feed(&mut self, raw: &str) {
        // Leading spaces only matter between records; mid-value they are
        // part of the continuation fragment.
        let line = if self.state == State::Null {
            raw.trim_start()
        } else {
            raw
        };

        // An empty line always resets the machine. A half-built value is
        // discarded; already-emitted nodes stay.
        if line.is_empty() {
            if self.state == State::Value {
                debug!("Discarding unterminated value for key {:?}", self.pending_key);
            }
            self.reset();
            return;
        }

        if self.state == State::Value {
            self.value_fragment(line);
            return;
        }

        if line.starts_with(['#', '!', ';']) {
            self.comment_line(line);
            return;
        }

        // Any other line closes an open comment block and starts a key.
        self.comment_idx = None;
        self.state = State::Null;
        self.key_line(line);
    }

    /// Drain the machine at end of input.
    fn finish(mut self) -> Vec<ContentNode> {
        if self.state == State::Value {
            // Stream ended while a continuation was pending; the caller
            // must never observe a partially-built node.
            debug!(
                "Stream ended mid-continuation, dropping half-built value for key {:?}",
                self.pending_key
            );
        }
        self.reset();
        self.nodes
    }

    fn reset(&mut self) {
        self.state = State::Null;
        self.pending_key = None;
        self.value_buf.clear();
        self.comment_idx = None;
    }

    fn take_order(&mut self) -> u32 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// A line starting a new key, or a malformed line to skip.
    fn key_line(&mut self, line: &str) {
        let Some((key, raw_value)) = split_key_value(line) else {
            debug!("Skipping line with no key delimiter: {line:?}");
            return;
        };
        trace!("Key line: {key:?}");
        self.pending_key = Some(key);
        self.value_buf.clear();
        self.state = State::Value;
        self.value_fragment(&raw_value);
    }

    /// Decode one physical line's worth of value text; emit the node once
    /// the value no longer continues.
    fn value_fragment(&mut self, fragment: &str) {
        let (decoded, continued) = decode_fragment(fragment);
        self.value_buf.push_str(&decoded);
        if continued {
            return;
        }
        let name = self.pending_key.take().unwrap_or_default();
        let text = std::mem::take(&mut self.value_buf);
        trace!("Emitting key/value node {name:?}");
        let node = ContentNode::key_value(self.take_order(), name, text);
        self.nodes.push(node);
        self.state = State::Null;
    }

    /// A line beginning or continuing a comment block.
    fn comment_line(&mut self, line: &str) {
        let Some(idx) = self.comment_idx else {
            self.open_comment(line);
            return;
        };

        // Continuation: append to the already-emitted node.
        let node = &mut self.nodes[idx];
        node.text_value.push('\n');
        node.text_value.push_str(line);

        // A comment, once promoted, stays promoted for all its
        // continuation lines.
        if self.state != State::LicenseHeader && classify::is_license_text(line) {
            // The license signature is typically the third physical line
            // of an MPL2 header, so the block was emitted as a plain
            // comment before the signature arrived. Swap it for a license
            // node at the same position, keeping order, timestamps, and
            // the text accumulated so far.
            if matches!(node.kind, NodeKind::Comment(_)) {
                node.relabel_as_license();
            }
            self.state = State::LicenseHeader;
        } else if self.state == State::Comment && classify::is_localization_note(line) {
            node.kind = NodeKind::Comment(CommentKind::LocalizationNote {
                entity: classify::note_entity_from_line(line),
            });
            self.state = State::LocalizationNote;
        }
    }

    /// First line of a comment block: classify and emit immediately.
    fn open_comment(&mut self, line: &str) {
        let order = self.take_order();
        let node = if classify::is_license_text(line) {
            self.state = State::LicenseHeader;
            ContentNode::license(order, line)
        } else if classify::is_localization_note(line) {
            self.state = State::LocalizationNote;
            let entity = classify::note_entity_from_line(line);
            ContentNode::comment(order, CommentKind::LocalizationNote { entity }, line)
        } else {
            self.state = State::Comment;
            ContentNode::comment(order, CommentKind::General, line)
        };
        trace!("Opening comment block as {:?}", node.kind);
        self.nodes.push(node);
        self.comment_idx = Some(self.nodes.len() - 1);
    }
}

/// Split a key line at the first unescaped `=`, or `:` if no `=` exists.
///
/// A delimiter-less line starting with `[` is an INI-style section header
/// and synthesizes `section.[Section]=[Section]`. Returns `None` for
/// malformed lines, which the caller skips.
fn split_key_value(line: &str) -> Option<(String, String)> {
    if let Some(pos) = find_unescaped(line, '=').or_else(|| find_unescaped(line, ':')) {
        let key = line[..pos].trim().to_string();
        let value = line[pos + 1..].to_string();
        Some((key, value))
    } else if line.starts_with('[') {
        Some((format!("section.{line}"), line.to_string()))
    } else {
        None
    }
}

/// Byte position of the first occurrence of `delim` not preceded by a
/// backslash escape.
fn find_unescaped(line: &str, delim: char) -> Option<usize> {
    let mut escaped = false;
    for (pos, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == delim {
            return Some(pos);
        }
    }
    None
}

/// Decode the escape sequences in one physical line of value text.
///
/// Returns the decoded fragment and whether the value continues on the
/// next line (a lone trailing backslash, which is dropped).
///
/// The escape table reproduces the historical runtime exactly: `\\`,
/// `\n`, `\t`, and `\r` are kept as their two-character escape sequences
/// so downstream re-serialization round-trips, `\uXXXX` is decoded to the
/// actual code point (up to 4 hex digits, fewer tolerated at end of
/// line), and any other escaped character stands for itself.
fn decode_fragment(fragment: &str) -> (String, bool) {
    let mut out = String::with_capacity(fragment.len());
    let mut chars = fragment.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            // Unescaped trailing backslash: the value continues.
            None => return (out, true),
            Some('\\') => out.push_str("\\\\"),
            Some(esc @ ('n' | 't' | 'r')) => {
                out.push('\\');
                out.push(esc);
            }
            Some('u') => {
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 4 {
                    let Some(digit) = chars.peek().and_then(|c| c.to_digit(16)) else {
                        break;
                    };
                    code = code * 16 + digit;
                    digits += 1;
                    chars.next();
                }
                if digits == 0 {
                    out.push('u');
                } else {
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            Some(other) => out.push(other),
        }
    }
    (out, false)
}
