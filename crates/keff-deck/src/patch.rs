//! Fixed-offset field patching.

use serde::{Deserialize, Serialize};

use keff_core::{format_sci, ErrorInfo, KeffError, RatioLink};

use crate::deck::Deck;

/// Leading indent before the record label.
const LABEL_INDENT: &str = "   ";
/// Gap between the record label and the value field.
const VALUE_GAP: &str = "    ";
/// Columns between the value field and the trailing annotation.
const ANNOTATION_GAP: usize = 56;

/// One patchable field of the deck, addressed by fixed 1-based line number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTarget {
    /// 1-based line number of the record.
    pub line: usize,
    /// Trailing classification code the line must carry (left untouched).
    #[serde(default = "FieldTarget::default_annotation")]
    pub annotation: String,
}

impl FieldTarget {
    fn default_annotation() -> String {
        "D 17".to_string()
    }
}

/// Snapshot of a validated target line: the parts the patcher must carry
/// over unchanged.
struct ValidatedField {
    label: String,
    terminator: String,
}

/// Patches a single field in place, preserving the record label, the
/// trailing annotation, and the line terminator.
pub fn patch_field(deck: &mut Deck, target: &FieldTarget, value: f64) -> Result<(), KeffError> {
    let field = validate_target(deck, target)?;
    apply(deck, target, &field, value);
    tracing::info!(
        line = target.line,
        value = %format_sci(value),
        "patched deck field"
    );
    Ok(())
}

/// Patches a primary field and its ratio-linked dependent field atomically:
/// both target lines are validated before either is rewritten, so a failure
/// on the second target leaves the deck untouched.
///
/// Returns the derived dependent value. The achieved ratio is recomputed
/// and logged for verification; it is never corrected.
pub fn patch_linked_fields(
    deck: &mut Deck,
    primary: &FieldTarget,
    linked: &FieldTarget,
    ratio: &RatioLink,
    value: f64,
) -> Result<f64, KeffError> {
    let derived = ratio.derive(value);
    let primary_field = validate_target(deck, primary)?;
    let linked_field = validate_target(deck, linked)?;
    apply(deck, primary, &primary_field, value);
    apply(deck, linked, &linked_field, derived);
    let achieved = value / derived;
    tracing::info!(
        primary_line = primary.line,
        linked_line = linked.line,
        primary = %format_sci(value),
        linked = %format_sci(derived),
        achieved_ratio = achieved,
        expected_ratio = ratio.ratio(),
        "patched linked deck fields"
    );
    Ok(derived)
}

/// Checks that the target line exists, splits into at least two tokens, and
/// still ends with the expected annotation.
fn validate_target(deck: &Deck, target: &FieldTarget) -> Result<ValidatedField, KeffError> {
    let line = deck.line(target.line)?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(KeffError::Patch(
            ErrorInfo::new("line-malformed", "target line has fewer than 2 fields")
                .with_context("line", target.line.to_string())
                .with_context("content", line.trim_end().to_string()),
        ));
    }
    if !line.trim_end().ends_with(target.annotation.as_str()) {
        return Err(KeffError::Patch(
            ErrorInfo::new(
                "annotation-drift",
                "target line no longer carries the expected trailing annotation",
            )
            .with_context("line", target.line.to_string())
            .with_context("expected", target.annotation.clone())
            .with_hint("the deck layout may have shifted; refuse to patch blindly"),
        ));
    }
    Ok(ValidatedField {
        label: tokens[0].to_string(),
        terminator: line_terminator(line).to_string(),
    })
}

fn apply(deck: &mut Deck, target: &FieldTarget, field: &ValidatedField, value: f64) {
    let rebuilt = format!(
        "{LABEL_INDENT}{label}{VALUE_GAP}{value}{gap}{annotation}{terminator}",
        label = field.label,
        value = format_sci(value),
        gap = " ".repeat(ANNOTATION_GAP),
        annotation = target.annotation,
        terminator = field.terminator,
    );
    deck.set_line(target.line, rebuilt);
}

fn line_terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminators_are_detected() {
        assert_eq!(line_terminator("x\r\n"), "\r\n");
        assert_eq!(line_terminator("x\n"), "\n");
        assert_eq!(line_terminator("x"), "");
    }
}
