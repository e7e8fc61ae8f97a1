//! Treeviz formatter for syntax trees
//!
//! One line per node, children drawn below their parent with box-drawing connectors and
//! two columns of indentation per level. Each line shows the production name and the
//! matched text, escaped and truncated to [FormatOptions::text_width] characters:
//!
//! ```text
//! sum "1 + 2 + 3"
//! └─ term "1 + 2 + 3"
//!   └─ sum "1 + 2"
//!     └─ term "1 + 2"
//!       └─ sum "1"
//! ```
//!
//! With [FormatOptions::line_numbers] each line is prefixed by the one-based line of the
//! node's start.

use super::FormatOptions;
use crate::grammar::parsing::SyntaxNode;

fn truncate(s: &str, max_chars: usize) -> String {
    let escaped: String = s.escape_debug().collect();
    if escaped.chars().count() > max_chars {
        let mut truncated = escaped.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        escaped
    }
}

fn label(node: &SyntaxNode, options: &FormatOptions) -> String {
    format!("{} \"{}\"", node.name(), truncate(node.text(), options.text_width))
}

fn linum(node: &SyntaxNode, options: &FormatOptions) -> String {
    if options.line_numbers {
        format!("{:02} ", node.position().line + 1)
    } else {
        String::new()
    }
}

fn format_node(
    node: &SyntaxNode,
    prefix: &str,
    is_last: bool,
    options: &FormatOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{}{} {}\n",
        linum(node, options),
        prefix,
        connector,
        label(node, options)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_children(node, &child_prefix, options, output);
}

fn format_children(node: &SyntaxNode, prefix: &str, options: &FormatOptions, output: &mut String) {
    let count = node.children().len();
    for (i, child) in node.children().iter().enumerate() {
        format_node(child, prefix, i + 1 == count, options, output);
    }
}

pub(super) fn render(tree: &SyntaxNode, options: &FormatOptions) -> String {
    let mut output = format!("{}{}\n", linum(tree, options), label(tree, options));
    format_children(tree, "", options, &mut output);
    output
}

pub fn to_treeviz_str(tree: &SyntaxNode) -> String {
    render(tree, &FormatOptions::default())
}
