/// Scope carried by YAML mapping keys.
pub const YAML_KEY_SCOPE: &str = "entity.name.tag.yaml";
/// Scope carried by JSON object keys.
pub const JSON_DICTIONARY_SCOPE: &str = "meta.structure.dictionary.json";

/// A lexical unit of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Classification tags, outermost first (e.g. `source.yaml`,
    /// `entity.name.tag.yaml`).
    pub scopes: Vec<String>,
    /// Literal text of the token.
    pub value: String,
}

impl Token {
    pub fn new<S: Into<String>>(scopes: &[&str], value: S) -> Self {
        Self {
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            value: value.into(),
        }
    }

    /// Whether the token plays the role of a mapping key.
    pub fn is_structural_key(&self) -> bool {
        self.scopes
            .iter()
            .any(|scope| scope == YAML_KEY_SCOPE || scope == JSON_DICTIONARY_SCOPE)
    }

    /// Width of the token in characters.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// The ordered tokens of a single line. Token values partition the line: their
/// concatenation is the line text without its trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedLine {
    pub tokens: Vec<Token>,
}

impl TokenizedLine {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.value.as_str()).collect()
    }
}

/// Per-line tokenization of a document, as provided by an editor or by
/// [`TokenizedDocument`](crate::linter::tokenizer::TokenizedDocument).
pub trait LineTokenSource {
    /// Number of lines the source reports. Some sources report one less than
    /// the usable range, so consumers probe up to and including this index.
    fn line_count(&self) -> usize;

    /// Tokens of the 0-based `line`, or `None` once past the end.
    fn tokens_for_line(&self, line: usize) -> Option<TokenizedLine>;
}

impl<T: LineTokenSource + ?Sized> LineTokenSource for &T {
    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn tokens_for_line(&self, line: usize) -> Option<TokenizedLine> {
        (**self).tokens_for_line(line)
    }
}

impl LineTokenSource for [TokenizedLine] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn tokens_for_line(&self, line: usize) -> Option<TokenizedLine> {
        self.get(line).cloned()
    }
}

impl LineTokenSource for Vec<TokenizedLine> {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }

    fn tokens_for_line(&self, line: usize) -> Option<TokenizedLine> {
        self.as_slice().tokens_for_line(line)
    }
}
