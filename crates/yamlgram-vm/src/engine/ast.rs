//! Parse tree produced by the interpreter.

use std::ops::Range;

use serde::Serialize;
use yamlgram_core::Parameters;

use super::tree::{TreeOptions, format_tree};

/// One successful production invocation.
///
/// Literals and character sets do not produce nodes; only `Ref`s do, so
/// `content` lists the productions invoked directly under this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstNode {
    pub name: String,
    /// Parameters the production was invoked with.
    pub parameters: Parameters,
    pub content: Vec<AstNode>,
    /// Byte range in the source text.
    pub range: Range<usize>,
}

impl AstNode {
    /// Source text covered by this node. Empty if `source` is not the parsed text.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.range.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&AstNode> {
        self.content.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AstNode> {
        self.content.iter().filter(move |c| c.name == name)
    }

    /// Depth-first search of the whole subtree, this node included.
    pub fn find(&self, name: &str) -> Option<&AstNode> {
        if self.name == name {
            return Some(self);
        }
        self.content.iter().find_map(|c| c.find(name))
    }

    /// S-expression rendering with leaf text.
    pub fn dump(&self, source: &str) -> String {
        self.dump_with(source, TreeOptions::default())
    }

    pub fn dump_with(&self, source: &str, options: TreeOptions) -> String {
        format_tree(self, source, options)
    }
}
