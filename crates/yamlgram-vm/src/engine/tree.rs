//! S-expression printer for parse trees.

use yamlgram_core::Colors;

use super::ast::AstNode;

#[derive(Clone, Copy, Debug, Default)]
pub struct TreeOptions {
    /// Append `[start..end]` byte ranges.
    pub spans: bool,
    /// Show bound parameters after each name.
    pub parameters: bool,
    pub colors: Colors,
}

impl TreeOptions {
    pub fn spans(mut self, on: bool) -> Self {
        self.spans = on;
        self
    }

    pub fn parameters(mut self, on: bool) -> Self {
        self.parameters = on;
        self
    }

    pub fn colored(mut self, on: bool) -> Self {
        self.colors = Colors::new(on);
        self
    }
}

pub(crate) fn format_tree(node: &AstNode, source: &str, options: TreeOptions) -> String {
    let mut out = String::new();
    format_node(&mut out, node, source, 0, options);
    out.push('\n');
    out
}

fn format_node(out: &mut String, node: &AstNode, source: &str, depth: usize, options: TreeOptions) {
    let c = options.colors;
    let indent = "  ".repeat(depth);

    out.push_str(&indent);
    out.push('(');
    out.push_str(c.production);
    out.push_str(&node.name);
    out.push_str(c.reset);
    if options.parameters && !node.parameters.is_empty() {
        out.push_str(&format!("{}{}{}", c.muted, node.parameters, c.reset));
    }

    if node.content.is_empty() {
        out.push_str(&format!(
            " {}\"{}\"{}",
            c.matched,
            escape_string(node.text(source)),
            c.reset
        ));
    }
    if options.spans {
        out.push_str(&format!(
            " {}[{}..{}]{}",
            c.muted, node.range.start, node.range.end, c.reset
        ));
    }

    for child in &node.content {
        out.push('\n');
        format_node(out, child, source, depth + 1, options);
    }
    out.push(')');
}

pub(crate) fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c if c.is_control() => result.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => result.push(c),
        }
    }
    result
}
