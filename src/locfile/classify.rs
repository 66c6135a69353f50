//! Comment classification rules shared by both parsers.
//!
//! The historical comment conventions have no formal grammar; they are
//! told apart with signature substrings and regular expressions. All
//! patterns are compiled once and shared read-only across threads.

use regex::Regex;
use std::sync::OnceLock;

/// MPL1 tri-license block opener. Real headers use five asterisks, which
/// this substring still matches.
pub const MPL1_MARKER: &str = "*** BEGIN LICENSE BLOCK ***";
/// MPL2 license URL, quoted in the standard three-line header.
pub const MPL2_MARKER: &str = "http://mozilla.org/MPL/2.0/";
/// Marker promoting a plain comment to a localization note. Checked
/// against upper-cased text.
pub const LOC_NOTE_MARKER: &str = "LOCALIZATION NOTE";

/// Extracts the referenced key from a single properties comment line,
/// e.g. `# LOCALIZATION NOTE (myKey): do not translate`.
static LINE_NOTE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Extracts the referenced entity from a whole DTD comment block. The
/// historical pattern is quirky: the character class excludes dots, so
/// dotted entity names never match, and the tail requires the note to end
/// in periods or newlines. Preserved as-is for behavioral fidelity.
static BLOCK_NOTE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn line_note_regex() -> &'static Regex {
    LINE_NOTE_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)LOCALIZATION NOTE \(([^)]+)\)")
            .expect("Invalid localization note line pattern")
    })
}

fn block_note_regex() -> &'static Regex {
    BLOCK_NOTE_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)LOCALIZATION NOTE\s+\(([^).]+)\):?[\n.]+$")
            .expect("Invalid localization note block pattern")
    })
}

/// Whether comment text carries a recognized license signature.
pub fn is_license_text(text: &str) -> bool {
    text.contains(MPL1_MARKER) || text.contains(MPL2_MARKER)
}

/// Whether comment text follows the localization note convention.
pub fn is_localization_note(text: &str) -> bool {
    text.to_uppercase().contains(LOC_NOTE_MARKER)
}

/// Referenced key from one properties comment line, if the line matches.
pub fn note_entity_from_line(line: &str) -> Option<String> {
    line_note_regex()
        .captures(line)
        .map(|caps| caps[1].to_string())
}

/// Referenced entity from a whole DTD comment block, if the block matches.
pub fn note_entity_from_block(text: &str) -> Option<String> {
    block_note_regex()
        .captures(text)
        .map(|caps| caps[1].to_string())
}
