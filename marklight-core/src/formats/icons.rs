//! Icon mapping for the tree visualization

/// Get the Unicode icon for a node type name (as returned by `NodeType::name`)
///
/// Unknown names map to `○`.
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "document" => "⧉",
        "paragraph" => "¶",
        "heading" => "§",
        "blockquote" => "❝",
        "code_block" => "𝒱",
        "horizontal_rule" => "⎯",
        "bullet_list" | "ordered_list" => "☰",
        "list_item" => "•",
        "task_list" => "☑",
        "task_item" => "☐",
        "table" => "▦",
        "table_row" => "▤",
        "table_header" | "table_cell" => "▫",
        "math_block" | "math_inline" => "√",
        "footnote_block" => "†",
        "footnote_item" | "footnote_ref" => "³",
        "definition_list" | "definition_description" => "≔",
        "definition_term" => "⊤",
        "image" => "▣",
        "hard_break" => "↵",
        "text" => "◦",
        _ => "○",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_mappings() {
        assert_eq!(get_icon("document"), "⧉");
        assert_eq!(get_icon("paragraph"), "¶");
        assert_eq!(get_icon("heading"), "§");
        assert_eq!(get_icon("bullet_list"), "☰");
        assert_eq!(get_icon("ordered_list"), "☰");
        assert_eq!(get_icon("list_item"), "•");
        assert_eq!(get_icon("code_block"), "𝒱");
        assert_eq!(get_icon("hard_break"), "↵");
    }

    #[test]
    fn test_unknown_node_type() {
        assert_eq!(get_icon("UnknownType"), "○");
    }
}
