use std::cell::Cell;
use std::io::Write;
use std::path::Path;

use swagger_lint::{
    DocumentBuffer, EditorBuffer, PathSegment, Range, SpecValidator, ValidateOptions,
    ValidatorError, linter::tokenizer::{Grammar, TokenizedDocument}, resolve_range,
};
use tempfile::NamedTempFile;

pub const PETS_YAML: &str = "swagger: \"2.0\"\npaths:\n  /pets:\n    get:\n      responses: {}";

pub fn keys(path: &[&str]) -> Vec<PathSegment> {
    path.iter().map(|k| PathSegment::parse(k)).collect()
}

/// Tokenize `text` and resolve `path` against it, returning the range and the
/// text it covers.
pub fn run_resolve_case(
    text: &str,
    grammar: Grammar,
    path: &[&str],
) -> Option<(Range, String)> {
    let document = TokenizedDocument::new(text, grammar).expect("Failed to tokenize");
    let range = resolve_range(&keys(path), &document)?;
    let slice = range.slice(text).expect("Range outside of text").to_string();
    Some((range, slice))
}

macro_rules! resolve_case {
    (
        $fn_name:ident,
        $grammar:expr,
        $text:expr,
        $path:expr,
        $expected:expr
    ) => {
        #[test]
        fn $fn_name() {
            let resolved = crate::helpers::run_resolve_case($text, $grammar, $path);
            let expected: Option<(swagger_lint::Range, &str)> = $expected;
            assert_eq!(
                resolved
                    .as_ref()
                    .map(|(range, slice)| (*range, slice.as_str())),
                expected,
                "{}",
                stringify!($fn_name)
            );
        }
    };
}

/// A validator that always answers the same way and counts its calls.
pub struct StaticValidator {
    result: Result<(), ValidatorError>,
    calls: Cell<usize>,
}

impl StaticValidator {
    pub fn new(result: Result<(), ValidatorError>) -> Self {
        Self {
            result,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl SpecValidator for StaticValidator {
    async fn validate(&self, _path: &Path, _options: &ValidateOptions) -> Result<(), ValidatorError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

/// A validator during which the user keeps typing.
pub struct EditingValidator<'a> {
    pub buffer: &'a DocumentBuffer,
    pub replacement: String,
    pub result: Result<(), ValidatorError>,
}

impl SpecValidator for EditingValidator<'_> {
    async fn validate(&self, _path: &Path, _options: &ValidateOptions) -> Result<(), ValidatorError> {
        self.buffer.set_text(self.replacement.clone());
        self.result.clone()
    }
}

/// Write `content` to a temporary file whose name ends with `suffix`.
pub fn temp_document(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

/// Open a buffer over a temporary file, as an editor would.
pub fn open_buffer(file: &NamedTempFile) -> DocumentBuffer {
    let buffer = DocumentBuffer::open(file.path()).expect("Failed to open buffer");
    assert_eq!(buffer.path(), file.path());
    buffer
}
