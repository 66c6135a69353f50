use locfile_reader::{CommentKind, FileFormat, NodeKind};
use std::env;
use std::fs;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <path-to-properties-or-dtd-file> [--encoding <LABEL>]",
            args[0]
        );
        std::process::exit(1);
    }

    let path = &args[1];
    let mut encoding_label: Option<&str> = None;
    // Parse --encoding argument
    if let Some(encoding_idx) = args.iter().position(|arg| arg == "--encoding") {
        if let Some(label) = args.get(encoding_idx + 1) {
            encoding_label = Some(label);
        } else {
            eprintln!("ERROR: --encoding flag requires an argument.");
            std::process::exit(1);
        }
    }

    let Some(format) = FileFormat::from_path(path) else {
        eprintln!("ERROR: Unrecognized file extension (expected .properties or .dtd)");
        std::process::exit(1);
    };

    // Decode the file bytes before handing them to the parser; the library
    // itself only accepts already-decoded character streams. Defaults to
    // UTF-8; legacy files from the Latin-1 era need an explicit override.
    let encoding = match encoding_label {
        Some(label) => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc,
            None => {
                eprintln!("ERROR: Unknown encoding label: {}", label);
                std::process::exit(1);
            }
        },
        None => encoding_rs::UTF_8,
    };

    println!("Reading {} file: {}", format.debug_name(), path);
    println!("Encoding: {}", encoding.name());
    println!("{}", "=".repeat(60));

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("\nERROR: Failed to read {}", path);
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };
    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        eprintln!(
            "WARNING: Some bytes did not decode cleanly as {}",
            encoding.name()
        );
    }

    match format.parse_str(&text) {
        Ok(nodes) => {
            let mut key_values = 0;
            let mut comments = 0;
            let mut notes = 0;
            let mut licenses = 0;
            let mut externals = 0;

            println!("\nContent nodes:");
            for node in &nodes {
                match &node.kind {
                    NodeKind::KeyValue => {
                        key_values += 1;
                        println!("  {:>4}. {} = {}", node.order_in_file, node.name, node.text_value);
                    }
                    NodeKind::Comment(CommentKind::General) => {
                        comments += 1;
                        println!("  {:>4}. [comment] {}", node.order_in_file, first_line(&node.text_value));
                    }
                    NodeKind::Comment(CommentKind::LocalizationNote { entity }) => {
                        notes += 1;
                        println!(
                            "  {:>4}. [note for {}] {}",
                            node.order_in_file,
                            entity.as_deref().unwrap_or("?"),
                            first_line(&node.text_value)
                        );
                    }
                    NodeKind::License => {
                        licenses += 1;
                        println!("  {:>4}. [license header]", node.order_in_file);
                    }
                    NodeKind::ExternalEntity { system_id, .. } => {
                        externals += 1;
                        println!("  {:>4}. [external] {} -> {}", node.order_in_file, node.name, system_id);
                    }
                }
            }

            println!("\n{}", "=".repeat(60));
            println!("SUCCESS! Parsing completed.");
            println!("{}", "=".repeat(60));
            println!("\nStatistics:");
            println!("  Total nodes: {}", nodes.len());
            println!("  Key/value pairs: {}", key_values);
            println!("  Comments: {}", comments);
            println!("  Localization notes: {}", notes);
            println!("  License headers: {}", licenses);
            println!("  External entities: {}", externals);
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to parse {} file", format.debug_name());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
