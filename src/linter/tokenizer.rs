use std::ops::Range as ByteRange;
use std::path::Path;

use swagger_lint_utils::PrettyPrint;
use thiserror::Error;
use tracing::{Level, debug, trace};
use tree_sitter::{Language, Node, Parser, Tree};

use crate::linter::tokens::{
    JSON_DICTIONARY_SCOPE, LineTokenSource, Token, TokenizedLine, YAML_KEY_SCOPE,
};

/// Node kinds whose `key` field names a mapping key, across both grammars.
const PAIR_KINDS: [&str; 3] = ["block_mapping_pair", "flow_pair", "pair"];

/// The syntax a document is tokenized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Yaml,
    Json,
}

impl Grammar {
    /// Pick a grammar from the file extension, falling back to sniffing the
    /// first non-blank character of the text.
    pub fn detect(path: Option<&Path>, text: &str) -> Self {
        let extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Grammar::Json,
            Some("yaml") | Some("yml") => Grammar::Yaml,
            _ => match text.trim_start().chars().next() {
                Some('{') | Some('[') => Grammar::Json,
                _ => Grammar::Yaml,
            },
        }
    }

    fn language(self) -> Language {
        match self {
            Grammar::Yaml => tree_sitter_yaml::LANGUAGE.into(),
            Grammar::Json => tree_sitter_json::LANGUAGE.into(),
        }
    }

    fn base_scope(self) -> &'static str {
        match self {
            Grammar::Yaml => "source.yaml",
            Grammar::Json => "source.json",
        }
    }

    fn key_token(self, value: &str, quoted: bool) -> Token {
        match (self, quoted) {
            (Grammar::Yaml, false) => Token::new(&["source.yaml", YAML_KEY_SCOPE], value),
            (Grammar::Yaml, true) => {
                Token::new(&["source.yaml", "string.quoted.yaml", YAML_KEY_SCOPE], value)
            }
            (Grammar::Json, _) => Token::new(
                &[
                    "source.json",
                    JSON_DICTIONARY_SCOPE,
                    "string.quoted.double.json",
                    "support.type.property-name.json",
                ],
                value,
            ),
        }
    }

    fn quote_token(self, value: &str) -> Token {
        match self {
            Grammar::Yaml => Token::new(&["source.yaml", "punctuation.definition.string.yaml"], value),
            Grammar::Json => Token::new(&["source.json", "punctuation.definition.string.json"], value),
        }
    }

    fn plain_token(self, value: &str) -> Token {
        Token::new(&[self.base_scope()], value)
    }
}

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("failed to load the {0:?} grammar: {1}")]
    Language(Grammar, #[source] tree_sitter::LanguageError),
    #[error("tree-sitter produced no syntax tree for the {0:?} document")]
    NoTree(Grammar),
}

/// Byte layout of one single-line mapping key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeySpan {
    row: usize,
    /// Whole key including quotes.
    outer: ByteRange<usize>,
    /// Key name without quotes.
    name: ByteRange<usize>,
}

impl KeySpan {
    fn from_node(node: Node<'_>, source: &str) -> Option<Self> {
        let row = node.start_position().row;
        if node.end_position().row != row {
            return None;
        }

        let outer = node.byte_range();
        let text = source.get(outer.clone())?;
        let quoted = text.len() >= 2
            && ((text.starts_with('"') && text.ends_with('"'))
                || (text.starts_with('\'') && text.ends_with('\'')));

        let name = if quoted {
            outer.start + 1..outer.end - 1
        } else {
            outer.clone()
        };

        if name.is_empty() {
            return None;
        }

        Some(Self { row, outer, name })
    }

    fn is_quoted(&self) -> bool {
        self.name != self.outer
    }
}

/// A document split into per-line tokens with TextMate-style scopes, derived
/// from a tree-sitter parse of the whole text.
///
/// Only mapping keys are classified; everything between keys on a line
/// becomes a plain token, so token values still partition every line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedDocument {
    grammar: Grammar,
    lines: Vec<TokenizedLine>,
}

impl TokenizedDocument {
    pub fn new(text: &str, grammar: Grammar) -> Result<Self, TokenizeError> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language())
            .map_err(|e| TokenizeError::Language(grammar, e))?;

        let tree = parser
            .parse(text, None)
            .ok_or(TokenizeError::NoTree(grammar))?;

        let keys = collect_keys(&tree, text);
        debug!(
            ?grammar,
            keys = keys.len(),
            has_error = tree.root_node().has_error(),
            "tokenized document"
        );

        if tracing::enabled!(Level::TRACE) {
            let marked: Vec<_> = keys.iter().map(|k| k.outer.clone()).collect();
            if let Ok(printed) = tree.root_node().pretty_printer().mark(&marked).print(text) {
                trace!("syntax tree:\n{}", printed);
            }
        }

        Ok(Self {
            grammar,
            lines: split_lines(text, grammar, &keys),
        })
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn lines(&self) -> &[TokenizedLine] {
        &self.lines
    }
}

impl LineTokenSource for TokenizedDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn tokens_for_line(&self, line: usize) -> Option<TokenizedLine> {
        self.lines.get(line).cloned()
    }
}

fn collect_keys(tree: &Tree, source: &str) -> Vec<KeySpan> {
    let mut keys = Vec::new();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        if PAIR_KINDS.contains(&node.kind()) {
            if let Some(span) = node
                .child_by_field_name("key")
                .and_then(key_scalar)
                .and_then(|scalar| KeySpan::from_node(scalar, source))
            {
                keys.push(span);
            }
        }

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                keys.sort_by_key(|k| k.outer.start);
                return keys;
            }
        }
    }
}

/// The scalar a key node is spelled with, skipping tags and anchors.
fn key_scalar(node: Node<'_>) -> Option<Node<'_>> {
    if node.kind() == "string" || node.kind().ends_with("_scalar") {
        return Some(node);
    }

    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find_map(key_scalar);
    found
}

fn split_lines(text: &str, grammar: Grammar, keys: &[KeySpan]) -> Vec<TokenizedLine> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut remaining_keys = keys.iter().peekable();

    for (row, line) in text.split('\n').enumerate() {
        let line_end = line_start + line.len();
        let mut tokens = Vec::new();
        let mut pos = line_start;

        while let Some(key) = remaining_keys.next_if(|k| k.row <= row) {
            // Keys nested inside complex keys can repeat an earlier span.
            if key.row < row || key.outer.start < pos {
                continue;
            }

            if key.outer.start > pos {
                tokens.push(grammar.plain_token(&text[pos..key.outer.start]));
            }

            let name = &text[key.name.clone()];
            if key.is_quoted() {
                tokens.push(grammar.quote_token(&text[key.outer.start..key.name.start]));
                tokens.push(grammar.key_token(name, true));
                tokens.push(grammar.quote_token(&text[key.name.end..key.outer.end]));
            } else {
                tokens.push(grammar.key_token(name, false));
            }
            pos = key.outer.end;
        }

        if pos < line_end {
            tokens.push(grammar.plain_token(&text[pos..line_end]));
        }

        lines.push(TokenizedLine::new(tokens));
        // +1 for the newline
        line_start = line_end + 1;
    }

    lines
}
