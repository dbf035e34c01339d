//! Field validation for submitted task forms.

use crate::types::TaskForm;
use regex_lite::Regex;
use std::sync::LazyLock;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

pub const TITLE_REQUIRED: &str = "Title is required.";
pub const TITLE_TOO_LONG: &str = "Title must be 200 characters or fewer.";
pub const DESCRIPTION_TOO_LONG: &str = "Description must be 1000 characters or fewer.";
pub const DUE_DATE_INVALID: &str = "Please use the date picker (YYYY-MM-DD).";

// Month and day ranges are checked, calendar existence is not (2024-02-30 passes).
static DUE_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$")
        .expect("due date pattern is valid")
});

/// Check a submitted form and return every violated rule, in rule order.
///
/// All fields are trimmed before checking. An empty result means the form
/// is valid.
pub fn validate_task(form: &TaskForm) -> Vec<&'static str> {
    let title = form.title.trim();
    let description = form.description.trim();
    let due_date = form.due_date.trim();

    let mut errors = Vec::new();

    if title.is_empty() {
        errors.push(TITLE_REQUIRED);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        errors.push(TITLE_TOO_LONG);
    }
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.push(DESCRIPTION_TOO_LONG);
    }
    if !due_date.is_empty() && !is_due_date(due_date) {
        errors.push(DUE_DATE_INVALID);
    }

    errors
}

/// True if `s` has the `YYYY-MM-DD` shape.
pub fn is_due_date(s: &str) -> bool {
    DUE_DATE_PATTERN.is_match(s)
}
