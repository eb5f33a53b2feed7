//! CLI-specific transforms
//!
//! Each transform exposes one stage of the markdown pipeline:
//!
//! 1. **Tokenization** - Raw text → linear token stream
//!    - `tokens-json`: the token stream, children nested under `inline`
//!
//! 2. **Tree** - Tokens → document tree
//!    - `tree-json`: the tree's serde representation
//!    - `treeviz`: tree visualization with Unicode icons
//!
//! 3. **Editing** - Tree → per-block source maps
//!    - `source-map`: rebuilt source and offset arrays of every text block
//!
//! ## Extra Parameters
//!
//! - `ast-full`: for `treeviz`, also list every inline run with its marks
//! - `pretty`: for the JSON transforms, "false" writes compact JSON
//!
//! Example: `marklight inspect notes.md treeviz --extra-ast-full`

use marklight_core::editing::ParagraphMap;
use marklight_core::formats::markdown::abbreviations;
use marklight_core::formats::markdown::tokenizer::tokenize;
use marklight_core::formats::treeviz::to_treeviz_str_with_params;
use marklight_core::model::Abbreviations;
use marklight_core::MarkdownParser;
use serde_json::json;
use std::collections::HashMap;

/// All available CLI transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["tokens-json", "tree-json", "treeviz", "source-map"];

/// Execute a named transform on a source file with optional extra parameters.
///
/// `parser` carries the configured extension toggles.
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    parser: &MarkdownParser,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    let pretty = extra_params.get("pretty").map_or(true, |v| v != "false");

    match transform_name {
        "tokens-json" => {
            let options = parser.options();
            let (body, abbreviations) = if options.abbreviations {
                abbreviations::extract(source)
            } else {
                (source.to_string(), Abbreviations::new())
            };
            let tokens = tokenize(&body, options, &abbreviations);
            to_json(&tokens, pretty)
        }
        "tree-json" => {
            let doc = parser
                .try_parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            to_json(&doc, pretty)
        }
        "treeviz" => {
            let doc = parser
                .try_parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(to_treeviz_str_with_params(&doc, extra_params))
        }
        "source-map" => {
            let doc = parser
                .try_parse(source)
                .map_err(|e| format!("Transform failed: {e}"))?;
            let maps: Vec<serde_json::Value> = doc
                .textblock_paths()
                .into_iter()
                .filter_map(|path| {
                    let content = doc.block(&path)?.inline_content()?;
                    let map = ParagraphMap::build(content);
                    Some(json!({
                        "block": path.0,
                        "source": map.source,
                        "before_close": map.before_close,
                        "after_open": map.after_open,
                    }))
                })
                .collect();
            to_json(&maps, pretty)
        }
        other => Err(format!(
            "Unknown transform '{other}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map(|mut s| {
        s.push('\n');
        s
    })
    .map_err(|e| format!("JSON serialization failed: {e}"))
}
