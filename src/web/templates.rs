//! HTML templates for the task list.
//!
//! Templates are embedded at compile time using `include_str!` and filled
//! with [`fill`].

/// The task list page: create form, banner, errors and the task list.
pub const TASKS_TEMPLATE: &str = include_str!("templates/tasks.html");

/// Replace every `{{name}}` placeholder in one pass.
///
/// Substituted values are never rescanned, so user text that happens to look
/// like a placeholder is left alone. Unknown placeholders are kept verbatim.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_replaces_known_placeholders() {
        let out = fill("<p>{{a}} and {{b}}</p>", &[("a", "one"), ("b", "two")]);
        assert_eq!(out, "<p>one and two</p>");
    }

    #[test]
    fn fill_keeps_unknown_and_unterminated() {
        assert_eq!(fill("{{x}} {{a}}", &[("a", "1")]), "{{x}} 1");
        assert_eq!(fill("tail {{open", &[]), "tail {{open");
    }

    #[test]
    fn fill_does_not_rescan_values() {
        let out = fill("{{a}}|{{b}}", &[("a", "{{b}}"), ("b", "2")]);
        assert_eq!(out, "{{b}}|2");
    }

    #[test]
    fn tasks_template_has_all_slots() {
        for slot in [
            "{{banner}}",
            "{{errors}}",
            "{{create_title}}",
            "{{create_description}}",
            "{{create_due_date}}",
            "{{summary}}",
            "{{task_list}}",
        ] {
            assert!(TASKS_TEMPLATE.contains(slot), "missing {slot}");
        }
    }
}
