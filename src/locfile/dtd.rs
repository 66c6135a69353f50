//! Entity and comment extraction for `.dtd` localization files.
//!
//! A bare DTD body is not a well-formed XML document, so no off-the-shelf
//! document parser accepts it directly. The extractor splices the body
//! into the internal subset of a minimal synthetic document and drives a
//! generic XML tokenizer over the result; the declaration and comment
//! tokens that come back populate the node list. Cross-file includes
//! (`%brandDTD;` style parameter-entity references) are blanked out up
//! front so they are never resolved against the filesystem or network.
//!
//! Node order is a count of emitted declarations and comments, not a
//! physical line number: the generic tokenizer does not expose reliable
//! positions for declarations. A purpose-built DTD tokenizer would close
//! that gap; the dispatch layer keeps one swappable behind the same
//! contract.

use std::io::Read;
use std::sync::OnceLock;

use log::{debug, info, trace};
use regex::Regex;
use xmlparser::{EntityDefinition, ExternalId, Token, Tokenizer};

use super::classify;
use super::error::{ParseError, Result};
use super::models::{CommentKind, ContentNode};

/// Root element name of the synthetic wrapper document.
const SCAFFOLD_ROOT: &str = "locfile-scaffold";
/// Scaffold lines inserted before the spliced DTD body.
const SCAFFOLD_PREFIX_LINES: u64 = 1;

/// Matches parameter-entity references like `%brandDTD;`.
static PARAM_ENTITY_REF: OnceLock<Regex> = OnceLock::new();

fn param_entity_ref_regex() -> &'static Regex {
    PARAM_ENTITY_REF
        .get_or_init(|| Regex::new(r"%[^;%\s]+;").expect("Invalid parameter entity pattern"))
}

/// Parse one `.dtd` stream into ordered content nodes.
///
/// # Errors
/// Returns an error if:
/// - The stream cannot be read (`ParseError::Read`)
/// - The tokenizer fails inside the synthetic scaffolding, indicating a
///   setup problem (`ParseError::Configuration`)
/// - The DTD body contains markup the tokenizer cannot process
///   (`ParseError::Syntax`, with the line mapped back into the body)
///
/// Unlike the properties parser there is no partial recovery: a malformed
/// declarative-markup file cannot be safely resynchronized mid-stream.
pub fn parse<R: Read>(mut reader: R) -> Result<Vec<ContentNode>> {
    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    parse_str(&body)
}

/// Parse DTD source text already held in memory.
pub fn parse_str(body: &str) -> Result<Vec<ContentNode>> {
    info!("Parsing DTD stream ({} bytes)", body.len());
    let body_lines = body.lines().count() as u64;
    let scaffold = assemble_scaffold(body);

    let mut nodes: Vec<ContentNode> = Vec::new();
    for token in Tokenizer::from(scaffold.as_str()) {
        let token = token.map_err(|e| map_error(&e, body_lines))?;
        // Node order counts emitted callbacks, one per declaration or
        // comment, in arrival order.
        let order = nodes.len() as u32;
        match token {
            Token::Comment { text, .. } => {
                nodes.push(comment_node(order, text.as_str()));
            }
            Token::EntityDeclaration { name, definition, .. } => {
                nodes.push(entity_node(order, name.as_str(), &definition));
            }
            // Scaffold plumbing: the doctype brackets and the dummy root
            // element produce tokens of their own.
            _ => {}
        }
    }

    info!("DTD stream parsed: {} nodes", nodes.len());
    Ok(nodes)
}

/// Wrap the real DTD body in a synthetic document the tokenizer accepts.
///
/// Parameter-entity references are substituted with an empty placeholder:
/// resolving a `chrome://` cross-reference is out of scope and must never
/// block or fail the parse.
fn assemble_scaffold(body: &str) -> String {
    let blanked = param_entity_ref_regex().replace_all(body, "");
    if blanked.len() != body.len() {
        debug!("Blanked parameter-entity references from DTD body");
    }
    format!("<!DOCTYPE {SCAFFOLD_ROOT} [\n{blanked}\n]>\n<{SCAFFOLD_ROOT}/>\n")
}

/// Classify a whole comment block, which arrives as one token rather than
/// line by line.
fn comment_node(order: u32, text: &str) -> ContentNode {
    if classify::is_license_text(text) {
        trace!("DTD comment classified as license header");
        ContentNode::license(order, text)
    } else if classify::is_localization_note(text) {
        let entity = classify::note_entity_from_block(text);
        trace!("DTD comment classified as localization note for {entity:?}");
        ContentNode::comment(order, CommentKind::LocalizationNote { entity }, text)
    } else {
        ContentNode::comment(order, CommentKind::General, text)
    }
}

fn entity_node(order: u32, name: &str, definition: &EntityDefinition) -> ContentNode {
    match definition {
        EntityDefinition::EntityValue(value) => {
            trace!("Internal entity declaration: {name:?}");
            ContentNode::key_value(
                order,
                name.to_string(),
                decode_character_references(value.as_str()),
            )
        }
        EntityDefinition::ExternalId(ExternalId::System(system)) => {
            trace!("External entity declaration: {name:?}");
            ContentNode::external_entity(order, name.to_string(), None, system.as_str().to_string())
        }
        EntityDefinition::ExternalId(ExternalId::Public(public, system)) => {
            trace!("External entity declaration: {name:?}");
            ContentNode::external_entity(
                order,
                name.to_string(),
                Some(public.as_str().to_string()),
                system.as_str().to_string(),
            )
        }
    }
}

/// Map a tokenizer failure onto the error taxonomy.
///
/// Positions land in scaffold coordinates. A failure in the scaffold
/// prologue means the wrapper itself is broken, a setup problem rather
/// than a data problem. Anything past the prologue is a syntax error in
/// the source file; an unterminated construct can swallow the scaffold
/// epilogue and push the reported position past the body's last line, so
/// the line number is clamped into body coordinates.
fn map_error(error: &xmlparser::Error, body_lines: u64) -> ParseError {
    let row = u64::from(error.pos().row);
    if row > SCAFFOLD_PREFIX_LINES {
        ParseError::Syntax {
            line: (row - SCAFFOLD_PREFIX_LINES).min(body_lines.max(1)),
            message: error.to_string(),
        }
    } else {
        ParseError::Configuration(format!("scaffold rejected by tokenizer: {error}"))
    }
}

/// Decode the XML character references a declaration value may carry.
///
/// The tokenizer hands entity values back verbatim; the historical
/// runtime delivered them with predefined and numeric character
/// references already resolved. Unknown references are left untouched.
fn decode_character_references(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let reference = &tail[1..semi];
        match decode_reference(reference) {
            Some(decoded) => out.push(decoded),
            None => out.push_str(&tail[..=semi]),
        }
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = reference.strip_prefix("#x").or_else(|| reference.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = reference.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}
