//! Span-based text edits.

use splice_syntax::Span;

/// Replacement of one span of a document with new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }
}

/// Apply a set of non-overlapping edits to `text`.
///
/// Edits are applied back to front so earlier spans stay valid while later
/// ones are replaced.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.span.start.cmp(&a.span.start));

    let mut result = text.to_string();
    for edit in ordered {
        let start = edit.span.start as usize;
        let end = (edit.span.end as usize).min(result.len());
        result.replace_range(start..end, &edit.new_text);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_edits_back_to_front() {
        let text = "let a = f(1)\nlet b = f(2)\n";
        let edits = vec![
            TextEdit::new(Span::new(8, 12), "(1 + 1)"),
            TextEdit::new(Span::new(21, 25), "(2 + 2)"),
        ];
        assert_eq!(
            apply_edits(text, &edits),
            "let a = (1 + 1)\nlet b = (2 + 2)\n"
        );
    }

    #[test]
    fn deletion_is_an_empty_replacement() {
        let text = "keep\ndrop\nkeep\n";
        let edits = vec![TextEdit::new(Span::new(5, 10), "")];
        assert_eq!(apply_edits(text, &edits), "keep\nkeep\n");
    }
}
