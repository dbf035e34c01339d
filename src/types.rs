//! Core types for the task list.

use serde::{Deserialize, Serialize};

/// A task as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Calendar date as `YYYY-MM-DD`. `None` means the task has no due date.
    pub due_date: Option<String>,
    pub completed: bool,
    pub created_at: String,
}

/// Fields as submitted by the create and edit forms.
///
/// Missing form fields deserialize to empty strings so the validator sees
/// them the same way as blank inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
}

impl TaskForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: due_date.into(),
        }
    }

    /// Copy of the form with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            due_date: self.due_date.trim().to_string(),
        }
    }

    /// Convert a trimmed, validated form into store input.
    /// An empty due date becomes "no due date".
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            due_date: Some(self.due_date).filter(|d| !d.is_empty()),
        }
    }
}

/// Normalized task fields written by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Result of a successful write, carried to the list view as `?ok=<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Completed,
    Reopened,
    Deleted,
    Updated,
}

impl Outcome {
    /// Parse an outcome code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Outcome::Created),
            "completed" => Some(Outcome::Completed),
            "reopened" => Some(Outcome::Reopened),
            "deleted" => Some(Outcome::Deleted),
            "updated" => Some(Outcome::Updated),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::Completed => "completed",
            Outcome::Reopened => "reopened",
            Outcome::Deleted => "deleted",
            Outcome::Updated => "updated",
        }
    }

    /// Banner text shown on the list page.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Created => "Task created.",
            Outcome::Completed => "Task marked as completed.",
            Outcome::Reopened => "Task reopened.",
            Outcome::Deleted => "Task deleted.",
            Outcome::Updated => "Task updated.",
        }
    }

    /// Redirect target for the list view with this outcome's banner.
    pub fn redirect_target(self) -> String {
        format!("/tasks?ok={}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_codes_parse_back() {
        for outcome in [
            Outcome::Created,
            Outcome::Completed,
            Outcome::Reopened,
            Outcome::Deleted,
            Outcome::Updated,
        ] {
            assert_eq!(Outcome::from_code(outcome.code()), Some(outcome));
        }
    }

    #[test]
    fn unknown_outcome_code_is_none() {
        assert_eq!(Outcome::from_code(""), None);
        assert_eq!(Outcome::from_code("CREATED"), None);
        assert_eq!(Outcome::from_code("archived"), None);
    }

    #[test]
    fn redirect_target_carries_code() {
        assert_eq!(Outcome::Reopened.redirect_target(), "/tasks?ok=reopened");
    }

    #[test]
    fn trimmed_form_strips_every_field() {
        let form = TaskForm::new("  Buy milk ", "\t2 liters\n", " 2024-01-01 ");
        let trimmed = form.trimmed();
        assert_eq!(trimmed, TaskForm::new("Buy milk", "2 liters", "2024-01-01"));
    }

    #[test]
    fn form_fields_missing_from_submission_default_to_empty() {
        let form: TaskForm = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert_eq!(form, TaskForm::new("Buy milk", "", ""));
    }

    #[test]
    fn empty_due_date_becomes_none() {
        let task = TaskForm::new("Buy milk", "", "").into_new_task();
        assert_eq!(task.due_date, None);

        let task = TaskForm::new("Buy milk", "", "2024-01-01").into_new_task();
        assert_eq!(task.due_date.as_deref(), Some("2024-01-01"));
    }
}
