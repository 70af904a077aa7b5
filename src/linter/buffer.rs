use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::linter::{
    tokenizer::{Grammar, TokenizedDocument},
    tokens::{LineTokenSource, TokenizedLine},
};

/// A document open in an editor: its identity, its current text, and a live
/// per-line tokenization of that text.
pub trait EditorBuffer: LineTokenSource {
    fn path(&self) -> &Path;

    /// The full text as it is right now.
    fn text(&self) -> String;
}

/// An in-memory editor buffer.
///
/// Text can be replaced through a shared reference, so a host can keep editing
/// while a lint pass over the same buffer is waiting on the validator. The
/// tokenization is computed on first use and dropped whenever the text changes.
#[derive(Debug)]
pub struct DocumentBuffer {
    path: PathBuf,
    text: RefCell<String>,
    grammar: Option<Grammar>,
    tokens: RefCell<Option<TokenizedDocument>>,
}

impl DocumentBuffer {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(path: P, text: S) -> Self {
        Self {
            path: path.into(),
            text: RefCell::new(text.into()),
            grammar: None,
            tokens: RefCell::new(None),
        }
    }

    /// Read a buffer from disk.
    pub fn open<P: Into<PathBuf>>(path: P) -> std::io::Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)?;
        Ok(Self::new(path, text))
    }

    /// Force a grammar instead of detecting it from the path and text.
    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = Some(grammar);
        self
    }

    /// Replace the buffer contents.
    pub fn set_text<S: Into<String>>(&self, text: S) {
        *self.text.borrow_mut() = text.into();
        self.tokens.borrow_mut().take();
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
            .unwrap_or_else(|| Grammar::detect(Some(self.path.as_path()), &self.text.borrow()))
    }

    /// Run `f` against the tokenization of the current text, tokenizing first
    /// if needed. Returns `None` when the text cannot be tokenized.
    fn with_tokens<T>(&self, f: impl FnOnce(&TokenizedDocument) -> T) -> Option<T> {
        let mut cache = self.tokens.borrow_mut();
        if cache.is_none() {
            let grammar = self.grammar();
            match TokenizedDocument::new(&self.text.borrow(), grammar) {
                Ok(document) => *cache = Some(document),
                Err(e) => {
                    warn!(path = %self.path.display(), "could not tokenize buffer: {}", e);
                    return None;
                }
            }
        }
        cache.as_ref().map(f)
    }
}

impl LineTokenSource for DocumentBuffer {
    fn line_count(&self) -> usize {
        self.with_tokens(|document| document.line_count()).unwrap_or(0)
    }

    fn tokens_for_line(&self, line: usize) -> Option<TokenizedLine> {
        self.with_tokens(|document| document.tokens_for_line(line))
            .flatten()
    }
}

impl EditorBuffer for DocumentBuffer {
    fn path(&self) -> &Path {
        &self.path
    }

    fn text(&self) -> String {
        self.text.borrow().clone()
    }
}
