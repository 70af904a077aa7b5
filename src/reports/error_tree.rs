use std::borrow::Cow;
use std::io::{self, Write};

use ptree::{Style, TreeItem};

use crate::linter::{
    resolver::display_path,
    validator::{ErrorDetail, ValidatorError},
};

/// A validator error laid out as a tree: the error, its details, and each
/// detail's rejected alternatives. Printed in debug mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTree {
    label: String,
    children: Vec<ErrorTree>,
}

impl ErrorTree {
    pub fn from_error(error: &ValidatorError) -> Self {
        let label = match error {
            ValidatorError::Invalid { message, .. } => {
                message.lines().next().unwrap_or_default().to_string()
            }
            other => other.to_string(),
        };

        Self {
            label,
            children: error
                .details()
                .unwrap_or_default()
                .iter()
                .map(Self::from_detail)
                .collect(),
        }
    }

    fn from_detail(detail: &ErrorDetail) -> Self {
        Self {
            label: format!(
                "[{}] {} at {}",
                detail.code(),
                detail.message(),
                match display_path(detail.path()) {
                    path if path.is_empty() => "/".to_string(),
                    path => path,
                }
            ),
            children: detail.inner().iter().map(Self::from_detail).collect(),
        }
    }

    pub fn render(&self) -> io::Result<String> {
        let mut output = Vec::new();
        ptree::write_tree(self, &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

impl TreeItem for ErrorTree {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        write!(f, "{}", style.paint(&self.label))
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::resolver::PathSegment;

    #[test]
    fn test_nested_alternatives_are_children() {
        let error = ValidatorError::Invalid {
            message: "Swagger schema validation failed.\n  more".to_string(),
            details: vec![ErrorDetail::one_of(
                "no match",
                vec![PathSegment::from("paths"), PathSegment::from("/pets")],
                vec![ErrorDetail::single("A", "alt", vec![])],
            )],
        };

        let rendered = ErrorTree::from_error(&error).render().expect("render");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Swagger schema validation failed.");
        assert!(lines[1].ends_with("[ONE_OF_MISSING] no match at /paths//pets"));
        assert!(lines[2].ends_with("[A] alt at /"));
    }

    #[test]
    fn test_error_without_details_is_a_leaf() {
        let tree = ErrorTree::from_error(&ValidatorError::Schema("bad".to_string()));
        assert_eq!(tree.render().expect("render").trim_end(), "Invalid Swagger schema: bad");
    }
}
