//! Command-line interface for glint
//! Highlights a source file to the terminal with ANSI colors.
//!
//! Usage:
//!   glint `<path>` [--language `<name>`] [--theme `<name>`] [--fast]   - Render a file
//!   glint `<path>` --tokens                                            - Dump the token stream as JSON
//!   glint --list                                                       - List grammars and themes

use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};

use glint::render::highlight;
use glint::{grammar, theme, FastTokenizer, Tokenizer};

fn main() {
    let matches = Command::new("glint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Grammar-driven syntax highlighting for the terminal")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file")
                .required_unless_present("list")
                .index(1),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .short('l')
                .help("Grammar name (default: guessed from the file extension)"),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .short('t')
                .help("Theme name")
                .default_value("midnight"),
        )
        .arg(
            Arg::new("fast")
                .long("fast")
                .help("Use the fast-path scanner (flat categories, higher throughput)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Dump the token stream as JSON instead of rendering")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List available grammars and themes")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list") {
        handle_list_command();
        return;
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing");
    let theme_name = matches.get_one::<String>("theme").unwrap();
    let language = matches
        .get_one::<String>("language")
        .cloned()
        .or_else(|| language_for_path(path))
        .unwrap_or_else(|| {
            eprintln!("Cannot guess a language for '{}'; pass --language", path);
            process::exit(1);
        });

    handle_render_command(
        path,
        &language,
        theme_name,
        matches.get_flag("fast"),
        matches.get_flag("tokens"),
    );
}

fn handle_list_command() {
    println!("Grammars:");
    for name in grammar::builtin_names() {
        println!("  {}", name);
    }
    println!("Themes:");
    for name in theme::builtin_names() {
        println!("  {}", name);
    }
}

fn handle_render_command(path: &str, language: &str, theme_name: &str, fast: bool, tokens: bool) {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read '{}': {}", path, e);
        process::exit(1);
    });
    let grammar = grammar::builtin(language).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("Available grammars: {}", grammar::builtin_names().join(", "));
        process::exit(1);
    });
    let theme = theme::builtin(theme_name).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("Available themes: {}", theme::builtin_names().join(", "));
        process::exit(1);
    });

    if tokens {
        let engine = Tokenizer::new(Arc::clone(&grammar));
        let stream = engine.tokenize(&text);
        match serde_json::to_string_pretty(&stream) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Cannot serialize tokens: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let rendered = if fast {
        let scanner = FastTokenizer::new(&grammar);
        highlight(&text, &scanner, &grammar, &theme)
    } else {
        let engine = Tokenizer::new(Arc::clone(&grammar));
        highlight(&text, &engine, &grammar, &theme)
    };
    print!("{}", rendered);
}

/// Guess a grammar from the file extension.
fn language_for_path(path: &str) -> Option<String> {
    let extension = Path::new(path).extension()?.to_str()?;
    let language = match extension {
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "css" => "css",
        "html" | "htm" => "html",
        "json" => "json",
        _ => return None,
    };
    Some(language.to_string())
}
