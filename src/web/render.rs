//! Rendering of the task list page.

use chrono::NaiveDate;

use super::templates::{self, TASKS_TEMPLATE};
use crate::types::{Outcome, Task, TaskForm};

/// Which form a rejected submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(i64),
}

/// A submission that failed validation, shown back to the user.
#[derive(Debug, Clone, Copy)]
pub struct Rejected<'a> {
    pub target: FormTarget,
    pub values: &'a TaskForm,
    pub errors: &'a [&'static str],
}

/// Everything the list page shows.
#[derive(Debug, Clone, Copy)]
pub struct ListPage<'a> {
    pub tasks: &'a [Task],
    pub total: i64,
    pub completed: i64,
    pub banner: Option<Outcome>,
    pub rejected: Option<Rejected<'a>>,
    /// Reference date for overdue markers.
    pub today: NaiveDate,
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// True for an open task whose due date is a real date before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.completed {
        return false;
    }
    task.due_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .is_some_and(|due| due < today)
}

fn render_banner(banner: Option<Outcome>) -> String {
    banner
        .map(|outcome| {
            format!(
                r#"<div class="banner" role="status">{}</div>"#,
                outcome.message()
            )
        })
        .unwrap_or_default()
}

fn render_errors(errors: &[&str]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", html_escape(e)))
        .collect();
    format!(r#"<ul class="errors" role="alert">{items}</ul>"#)
}

fn render_summary(total: i64, completed: i64) -> String {
    let noun = if total == 1 { "task" } else { "tasks" };
    format!("{total} {noun}, {completed} completed")
}

fn render_task(task: &Task, edit: Option<&TaskForm>, today: NaiveDate) -> String {
    let id = task.id;
    let (toggle_action, toggle_label, toggle_mark) = if task.completed {
        ("uncomplete", "Reopen", "&#10003;")
    } else {
        ("complete", "Complete", "&#9675;")
    };

    let due_html = match task.due_date.as_deref() {
        Some(due) if is_overdue(task, today) => format!(
            r#"<span class="due overdue">Due {} (overdue)</span>"#,
            html_escape(due)
        ),
        Some(due) => format!(r#"<span class="due">Due {}</span>"#, html_escape(due)),
        None => String::new(),
    };

    let description_html = if task.description.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="task-desc">{}</p>"#,
            html_escape(&task.description)
        )
    };

    // A rejected edit reopens the panel with what the user typed.
    let (open, title, description, due_date) = match edit {
        Some(values) => (
            " open",
            values.title.as_str(),
            values.description.as_str(),
            values.due_date.as_str(),
        ),
        None => (
            "",
            task.title.as_str(),
            task.description.as_str(),
            task.due_date.as_deref().unwrap_or(""),
        ),
    };

    format!(
        r#"<li class="task{done}" id="task-{id}">
            <div class="task-head">
                <form class="inline" method="post" action="/tasks/{id}/{toggle_action}">
                    <button type="submit" class="btn" title="{toggle_label}" aria-label="{toggle_label}">{toggle_mark}</button>
                </form>
                <span class="task-title">{task_title}</span>
                {due_html}
                <form class="inline" method="post" action="/tasks/{id}/delete">
                    <button type="submit" class="btn btn-danger">Delete</button>
                </form>
            </div>
            {description_html}
            <details{open}>
                <summary>Edit</summary>
                <form method="post" action="/tasks/{id}/edit">
                    <label for="title-{id}">Title</label>
                    <input id="title-{id}" type="text" name="title" maxlength="200" required value="{title}">
                    <label for="description-{id}">Description</label>
                    <textarea id="description-{id}" name="description" maxlength="1000">{description}</textarea>
                    <label for="due-date-{id}">Due date</label>
                    <input id="due-date-{id}" type="date" name="due_date" value="{due_date}">
                    <p><button type="submit" class="btn btn-primary">Save</button></p>
                </form>
            </details>
        </li>"#,
        done = if task.completed { " done" } else { "" },
        id = id,
        toggle_action = toggle_action,
        toggle_label = toggle_label,
        toggle_mark = toggle_mark,
        task_title = html_escape(&task.title),
        due_html = due_html,
        description_html = description_html,
        open = open,
        title = html_escape(title),
        description = html_escape(description),
        due_date = html_escape(due_date),
    )
}

fn render_task_list(page: &ListPage<'_>) -> String {
    if page.tasks.is_empty() {
        return r#"<div class="empty-state">No tasks yet</div>"#.to_string();
    }

    let editing = page.rejected.and_then(|r| match r.target {
        FormTarget::Edit(id) => Some((id, r.values)),
        FormTarget::Create => None,
    });

    let mut html = String::from(r#"<ul class="task-list">"#);
    for task in page.tasks {
        let edit = editing
            .filter(|(id, _)| *id == task.id)
            .map(|(_, values)| values);
        html.push_str(&render_task(task, edit, page.today));
    }
    html.push_str("</ul>");
    html
}

/// Render the full list page.
pub fn list_page(page: &ListPage<'_>) -> String {
    // Errors replace the banner: a rejected submission is not an outcome.
    let (banner, errors) = match page.rejected {
        Some(rejected) => (String::new(), render_errors(rejected.errors)),
        None => (render_banner(page.banner), String::new()),
    };

    let create_values = page
        .rejected
        .filter(|r| r.target == FormTarget::Create)
        .map(|r| r.values.clone())
        .unwrap_or_default();

    let create_title = html_escape(&create_values.title);
    let create_description = html_escape(&create_values.description);
    let create_due_date = html_escape(&create_values.due_date);
    let summary = render_summary(page.total, page.completed);
    let task_list = render_task_list(page);

    templates::fill(
        TASKS_TEMPLATE,
        &[
            ("banner", banner.as_str()),
            ("errors", errors.as_str()),
            ("create_title", create_title.as_str()),
            ("create_description", create_description.as_str()),
            ("create_due_date", create_due_date.as_str()),
            ("summary", summary.as_str()),
            ("task_list", task_list.as_str()),
        ],
    )
}
