use tracing::{debug, info, instrument};

use crate::linter::{
    buffer::EditorBuffer,
    eligibility::can_validate,
    validator::{SpecValidator, ValidateOptions},
};
use crate::reports::{Diagnostic, error_tree::ErrorTree, to_messages};

/// The result of one lint pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// Diagnostics to display, replacing any earlier ones. Empty when the
    /// document is valid or is not a Swagger document.
    Messages(Vec<Diagnostic>),
    /// The buffer changed while the validator was running; the host should
    /// keep whatever it is showing.
    NoUpdate,
}

impl LintOutcome {
    pub fn messages(&self) -> Option<&[Diagnostic]> {
        match self {
            LintOutcome::Messages(messages) => Some(messages),
            LintOutcome::NoUpdate => None,
        }
    }

    pub fn is_no_update(&self) -> bool {
        matches!(self, LintOutcome::NoUpdate)
    }
}

/// Lint the document open in `buffer`.
///
/// The validator reads the file from disk, so its answer only applies if the
/// buffer text is unchanged once it returns. The text is captured before the
/// call and compared afterwards; any difference yields
/// [`LintOutcome::NoUpdate`].
#[instrument(level = "debug", skip_all, fields(path = %buffer.path().display()))]
pub async fn lint<B, V>(buffer: &B, validator: &V, options: &ValidateOptions) -> LintOutcome
where
    B: EditorBuffer + ?Sized,
    V: SpecValidator + ?Sized,
{
    let text = buffer.text();
    if !can_validate(&text) {
        debug!("not a Swagger document, skipping");
        return LintOutcome::Messages(Vec::new());
    }

    let result = validator.validate(buffer.path(), options).await;

    if buffer.text() != text {
        info!("buffer changed during validation, discarding result");
        return LintOutcome::NoUpdate;
    }

    match result {
        Ok(()) => LintOutcome::Messages(Vec::new()),
        Err(error) => {
            if tracing::enabled!(tracing::Level::DEBUG) {
                if let Ok(tree) = ErrorTree::from_error(&error).render() {
                    debug!("validator error:\n{}", tree);
                }
            }
            LintOutcome::Messages(to_messages(&error, buffer.path(), &text, buffer))
        }
    }
}
