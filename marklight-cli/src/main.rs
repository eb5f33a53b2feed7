// Command-line interface for marklight
//
// This binary exposes the markdown engine: converting between markdown, the
// JSON tree and the tree visualization, normalizing markdown, inspecting
// pipeline stages, and replaying editor key sequences against a block.
//
// Usage:
//  marklight <input> --to <format> [--from <format>] [--output <file>]  - Convert (default)
//  marklight convert <input> --to <format> [--from <format>] [--output <file>]
//  marklight format <input>                                   - Normalize markdown to stdout
//  marklight inspect <path> [<transform>]                     - Show a pipeline stage (defaults to "treeviz")
//  marklight edit <input> --block 0 --cursor 3 --keys ArrowLeft,Backspace
//  marklight --list-transforms                                - List available transforms
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format/transform.
// Example:
//  marklight inspect notes.md treeviz --extra-ast-full

mod transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use marklight_config::{Loader, MarklightConfig};
use marklight_core::editing::{Cursor, EditorState, Key, Keymap};
use marklight_core::formats::json::JsonFormat;
use marklight_core::formats::markdown::MarkdownFormat;
use marklight_core::formats::treeviz::TreevizFormat;
use marklight_core::model::BlockPath;
use marklight_core::{FormatRegistry, MarkdownParser, MarkdownSerializer, ParseOptions, SerializerOptions};
use std::collections::HashMap;
use std::fs;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-') || next.chars().count() == 1);
            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("marklight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting, inspecting and editing markdown documents")
        .long_about(
            "marklight keeps markdown text and a typed document tree in correspondence.\n\n\
            Commands:\n  \
            - convert: Transform between markdown, the JSON tree and treeviz\n  \
            - format:  Re-serialize markdown in its normalized form\n  \
            - inspect: View pipeline stages (tokens, tree, source maps)\n  \
            - edit:    Replay editor keys against one block\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            marklight inspect notes.md                  # Tree visualization\n  \
            marklight inspect notes.md tokens-json      # Token stream\n  \
            marklight notes.md --to json                # Convert to the JSON tree\n  \
            marklight format notes.md --extra-bullet-marker '*'",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a marklight.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect pipeline stages of a markdown file")
                .long_about(
                    "View the internal structure of a markdown file at different stages.\n\n\
                    Transforms:\n  \
                    - tokens-json: Linear token stream\n  \
                    - tree-json:   Document tree as JSON\n  \
                    - treeviz:     Tree visualization (default)\n  \
                    - source-map:  Rebuilt source and offset maps per text block\n\n\
                    Extra Parameters:\n  \
                    --extra-ast-full      List inline runs and their marks in treeviz\n  \
                    --extra-pretty false  Compact JSON output",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown (.md, .markdown)\n  \
                    - json:     Document tree as JSON (.json)\n  \
                    - treeviz:  Tree visualization (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Normalize a markdown file")
                .long_about(
                    "Parse a markdown file and serialize the tree back to markdown.\n\n\
                    Output is always written to stdout.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Replay editor keys against a block and print the result")
                .long_about(
                    "Places a collapsed cursor in one text block, feeds the keys through\n\
                    the editor keymap and prints the resulting markdown. The final cursor\n\
                    is written to stderr.\n\n\
                    Key names: ArrowLeft, ArrowRight, Backspace, Delete, Space, or a\n\
                    single character.\n\n\
                    Example:\n  \
                    marklight edit notes.md --block 0 --cursor 4 --keys ArrowRight,ArrowRight,Backspace",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("block")
                        .long("block")
                        .help("Block path as child indices, e.g. 0 or 1.0.0")
                        .default_value("0")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("cursor")
                        .long("cursor")
                        .help("Structural offset inside the block")
                        .default_value("0")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("keys")
                        .long("keys")
                        .help("Comma-separated key names")
                        .required(true)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means "convert"
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["inspect", "convert", "format", "edit", "help"].contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = required(sub_matches, "path");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("treeviz");
            handle_inspect_command(path, transform, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let registry = build_registry(&config);

            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match registry.detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output, &extra_params, &config);
        }
        Some(("format", sub_matches)) => {
            let input = required(sub_matches, "input");
            let registry = build_registry(&config);
            handle_convert_command(&registry, input, "markdown", "markdown", None, &extra_params, &config);
        }
        Some(("edit", sub_matches)) => {
            let input = required(sub_matches, "input");
            let block = parse_block_path(required(sub_matches, "block"));
            let offset = sub_matches.get_one::<usize>("cursor").copied().unwrap_or(0);
            let keys = required(sub_matches, "keys");
            handle_edit_command(input, block, offset, keys, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: missing argument '{name}'");
            std::process::exit(2);
        }
    }
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &MarklightConfig,
) {
    let source = read_source(path);
    let parser = MarkdownParser::new(ParseOptions::from(&config.parser));
    let params = build_inspect_params(config, extra_params);

    let output =
        transforms::execute_transform(&source, transform, &parser, &params).unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &MarklightConfig,
) {
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_source(input);
    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    log::debug!("Converting {input} from {from} to {to}");

    let mut format_options = HashMap::new();
    if to == "json" && !config.inspect.pretty_json {
        format_options.insert("pretty".to_string(), "false".to_string());
    }
    for (key, value) in extra_params {
        format_options.insert(key.clone(), value.clone());
    }

    let result = registry
        .serialize_with_options(&doc, to, &format_options)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the edit command
fn handle_edit_command(input: &str, block: BlockPath, offset: usize, keys: &str, config: &MarklightConfig) {
    let source = read_source(input);
    let parser = MarkdownParser::new(ParseOptions::from(&config.parser));
    let doc = parser.parse(&source);

    if doc.block(&block).and_then(|b| b.inline_content()).is_none() {
        eprintln!("Error: no text block at {block}");
        std::process::exit(1);
    }

    let keymap = Keymap::new(parser);
    let state = keys
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Key::from_name)
        .fold(EditorState::at(doc, Cursor::new(block, offset)), |state, key| {
            keymap.handle_key(state, &key)
        });

    let serializer = MarkdownSerializer::new(SerializerOptions::from(&config.serializer));
    print!("{}", serializer.serialize(&state.doc));
    eprintln!("cursor: {}", state.cursor());
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("  tokens-json  - Linear token stream (markdown-it style)");
    println!("  tree-json    - Document tree as JSON");
    println!("  treeviz      - Tree visualization");
    println!("  source-map   - Rebuilt source and offset maps per text block");

    println!("\nConversion formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        match registry.get(&format_name) {
            Ok(format) if !format.description().is_empty() => {
                println!("  {format_name:<12} - {}", format.description())
            }
            _ => println!("  {format_name}"),
        }
    }
}

fn build_registry(config: &MarklightConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(MarkdownFormat::new(
        ParseOptions::from(&config.parser),
        SerializerOptions::from(&config.serializer),
    ));
    registry.register(JsonFormat);
    registry.register(TreevizFormat);
    registry
}

fn load_cli_config(explicit_path: Option<&str>) -> MarklightConfig {
    let loader = Loader::new().with_optional_file("marklight.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn parse_block_path(raw: &str) -> BlockPath {
    let indices: Result<Vec<usize>, _> = raw
        .split(['.', '/', ','])
        .filter(|part| !part.is_empty())
        .map(str::parse::<usize>)
        .collect();
    match indices {
        Ok(indices) if !indices.is_empty() => BlockPath::new(indices),
        _ => {
            eprintln!("Invalid block path '{raw}'");
            std::process::exit(1);
        }
    }
}

fn apply_config_overrides(config: &mut MarklightConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["bullet-marker", "bullet"]) {
        match raw.as_str() {
            "-" | "*" | "+" => {
                config.serializer.bullet_marker = raw.chars().next().unwrap_or('-');
            }
            other => {
                eprintln!("Invalid bullet marker '{other}' for --extra-bullet-marker");
                std::process::exit(1);
            }
        }
    }
    if let Some(raw) = take_override(extra_params, &["pretty", "pretty-json"]) {
        config.inspect.pretty_json = parse_bool_arg("pretty", &raw);
    }

    let parser = &mut config.parser;
    let toggles: [(&str, &mut bool); 10] = [
        ("tables", &mut parser.tables),
        ("footnotes", &mut parser.footnotes),
        ("math", &mut parser.math),
        ("definition-lists", &mut parser.definition_lists),
        ("superscript", &mut parser.superscript),
        ("strikethrough", &mut parser.strikethrough),
        ("highlight", &mut parser.highlight),
        ("subscript", &mut parser.subscript),
        ("abbreviations", &mut parser.abbreviations),
        ("task-lists", &mut parser.task_lists),
    ];
    for (name, flag) in toggles {
        if let Some(raw) = extra_params.remove(name) {
            *flag = parse_bool_arg(name, &raw);
        }
    }
}

fn build_inspect_params(
    config: &MarklightConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert("pretty".to_string(), config.inspect.pretty_json.to_string());
    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }
    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
