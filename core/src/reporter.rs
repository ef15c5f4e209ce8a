//! Plain text rendering of check results.

use crate::type_checker::checker::{CheckReport, TypeError, Violation};

/// Printed when a namespace has no violations and no malformed functions.
pub const SUCCESS_MARKER: &str = "No violations found.";

/// Render one violation in the fixed multi-line format:
///
/// ```text
/// error: type mismatch in function 'f' at 1:40
///   Expected type: (Number, Number)
///   Actual: (Number | Null, Number)
///   Reason: Argument 1 of '+' may be null, but Number does not allow it
///   In: a + 20
/// ```
pub fn format_violation(violation: &Violation) -> String {
    let arity = match violation.arity {
        Some(arity) => format!(" (arity {})", arity),
        None => String::new(),
    };
    format!(
        "error: type mismatch in function '{}'{} at {}\n  \
         Expected type: {}\n  \
         Actual: {}\n  \
         Reason: {}\n  \
         In: {}",
        violation.function,
        arity,
        violation.info.start,
        violation.mismatch.expected_text(),
        violation.mismatch.actual_text(),
        violation.explanation,
        violation.expr
    )
}

/// Render the error that stopped `function` from being checked.
pub fn format_type_error(function: &str, err: &TypeError) -> String {
    let mut out = format!(
        "error: cannot check function '{}': {}",
        function, err.inner
    );
    if let Some(hint) = &err.inner.hint {
        out.push_str(&format!("\n  Hint: {}", hint));
    }
    out
}

/// Render a whole report: every violation and error in order, then a summary line.
pub fn format_report(report: &CheckReport) -> String {
    if report.is_success() {
        return SUCCESS_MARKER.to_string();
    }
    let mut blocks = vec![];
    for function in &report.functions {
        match &function.result {
            Ok(violations) => blocks.extend(violations.iter().map(format_violation)),
            Err(err) => blocks.push(format_type_error(&function.name, err)),
        }
    }
    let violations = report.violations().count();
    let errors = report.errors().count();
    blocks.push(format!(
        "Found {} violation(s) in {} function(s), {} function(s) could not be checked.",
        violations,
        report.functions.len(),
        errors
    ));
    blocks.join("\n\n")
}
