use ptree::{Style, TreeItem};
use std::borrow::Cow;
use std::io::{self, Write};
use std::ops::Range;
use tree_sitter::Node;

/// Renders a tree-sitter subtree with [ptree], optionally showing each node's
/// source text and marking nodes whose byte range was flagged (for example the
/// mapping keys a tokenizer picked up).
pub struct Printer<'a> {
    node: Node<'a>,
    marked: Vec<Range<usize>>,
    show_text: bool,
}

impl<'a> Printer<'a> {
    fn new(node: Node<'a>) -> Self {
        Self {
            node,
            marked: Vec::new(),
            show_text: false,
        }
    }

    /// Mark every node whose byte range equals one of `ranges`.
    pub fn mark(mut self, ranges: &[Range<usize>]) -> Self {
        self.marked = ranges.to_vec();
        self
    }

    pub fn show_text(mut self) -> Self {
        self.show_text = true;
        self
    }

    pub fn print(self, source: &str) -> io::Result<String> {
        let wrapper = SyntaxNode::build(
            self.node,
            &self.marked,
            if self.show_text { Some(source) } else { None },
        );

        let mut output = Vec::new();
        ptree::write_tree(&wrapper, &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

pub trait PrettyPrint {
    fn pretty_printer(&self) -> Printer<'_>;
}

impl PrettyPrint for Node<'_> {
    fn pretty_printer(&self) -> Printer<'_> {
        Printer::new(*self)
    }
}

#[derive(Clone)]
struct SyntaxNode {
    label: String,
    marked: bool,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    fn build(node: Node<'_>, marked: &[Range<usize>], source: Option<&str>) -> Self {
        let mut cursor = node.walk();
        let children = node
            .children(&mut cursor)
            .map(|child| Self::build(child, marked, source))
            .collect();

        let range = node.byte_range();
        let mut label = format!(
            "({} {}:{}..{}:{})",
            node.kind(),
            node.start_position().row,
            node.start_position().column,
            node.end_position().row,
            node.end_position().column,
        );

        if let Some(source) = source {
            let text = source.get(range.clone()).unwrap_or("");
            let preview: String = text.chars().take(40).collect();
            let ellipsis = if preview.len() < text.len() { "..." } else { "" };
            label.push_str(&format!(" \"{}{}\"", preview, ellipsis).replace('\n', "\\n"));
        }

        Self {
            label,
            marked: marked.contains(&range),
            children,
        }
    }
}

impl TreeItem for SyntaxNode {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        let marker = if self.marked { " <-- key" } else { "" };
        write!(f, "{}", style.paint(format!("{}{}", self.label, marker)))
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    #[test]
    fn test_marks_flagged_ranges() {
        let source = "swagger: \"2.0\"\n";
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_yaml::LANGUAGE.into())
            .expect("Failed to load YAML grammar");
        let tree = parser.parse(source, None).expect("Failed to parse");

        let printed = tree
            .root_node()
            .pretty_printer()
            .show_text()
            .mark(&[0..7])
            .print(source)
            .expect("Failed to print tree");

        assert!(printed.contains("block_mapping_pair"));
        assert!(printed.contains("<-- key"));
        assert!(printed.contains("\"swagger\""));
    }
}
