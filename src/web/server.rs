//! HTTP server implementation for the task list.
//!
//! This module provides the axum-based HTTP server: routes, handlers and the
//! server lifecycle.

use axum::{
    Router,
    extract::{Form, Path, Query, State, rejection::PathRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::render::{self, FormTarget, ListPage, Rejected};
use crate::db::Database;
use crate::error::{AppResult, internal_error_response};
use crate::types::{Outcome, TaskForm};
use crate::validate::validate_task;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct WebServer {
    /// Reference to the task database.
    db: Arc<Database>,
}

impl WebServer {
    /// Create a new server state.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the database reference.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Query parameters for the list view.
#[derive(Debug, Default, serde::Deserialize)]
struct ListParams {
    ok: Option<String>,
}

/// `302 Found` to the given target.
fn found(target: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

/// Parse a task id from the path. Anything but a positive integer is malformed.
fn parse_task_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Task id from an extracted path segment. A segment axum cannot decode
/// (e.g. invalid UTF-8) is as malformed as a non-numeric one.
fn path_task_id(path: Result<Path<String>, PathRejection>) -> Option<i64> {
    match path {
        Ok(Path(raw)) => parse_task_id(&raw),
        Err(rejection) => {
            debug!(%rejection, "Ignoring undecodable task id");
            None
        }
    }
}

/// Render the list page, optionally with a rejected submission.
fn render_list(
    state: &WebServer,
    banner: Option<Outcome>,
    rejected: Option<Rejected<'_>>,
) -> AppResult<String> {
    let (tasks, (total, completed)) = state.db().list_tasks_with_counts()?;

    Ok(render::list_page(&ListPage {
        tasks: &tasks,
        total,
        completed,
        banner,
        rejected,
        today: chrono::Local::now().date_naive(),
    }))
}

/// Re-render the list with validation errors and the submitted values.
fn reject(
    state: &WebServer,
    target: FormTarget,
    values: &TaskForm,
    errors: &[&'static str],
) -> AppResult<Response> {
    debug!(?target, ?errors, "Rejected task submission");
    let html = render_list(
        state,
        None,
        Some(Rejected {
            target,
            values,
            errors,
        }),
    )?;
    Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
}

/// Root endpoint - redirects to the list view.
async fn root() -> Response {
    found("/tasks")
}

/// List view with an optional outcome banner.
async fn list_page(
    State(state): State<WebServer>,
    Query(params): Query<ListParams>,
) -> AppResult<Html<String>> {
    let banner = params.ok.as_deref().and_then(Outcome::from_code);
    Ok(Html(render_list(&state, banner, None)?))
}

/// Create a task from the new-task form.
async fn create_task(
    State(state): State<WebServer>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let trimmed = form.trimmed();
    let errors = validate_task(&trimmed);
    if !errors.is_empty() {
        return reject(&state, FormTarget::Create, &form, &errors);
    }

    let id = state.db().create_task(&trimmed.into_new_task())?;
    info!(task_id = id, "Task created");
    Ok(found(&Outcome::Created.redirect_target()))
}

/// Replace a task's title, description and due date.
async fn edit_task(
    State(state): State<WebServer>,
    path: Result<Path<String>, PathRejection>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let Some(id) = path_task_id(path) else {
        return Ok(found("/tasks"));
    };

    let trimmed = form.trimmed();
    let errors = validate_task(&trimmed);
    if !errors.is_empty() {
        return reject(&state, FormTarget::Edit(id), &form, &errors);
    }

    let changed = state.db().update_task(id, &trimmed.into_new_task())?;
    info!(task_id = id, changed, "Task updated");
    Ok(found(&Outcome::Updated.redirect_target()))
}

fn set_completion(state: &WebServer, id: Option<i64>, completed: bool) -> AppResult<Response> {
    let Some(id) = id else {
        return Ok(found("/tasks"));
    };

    let changed = state.db().set_completed(id, completed)?;
    info!(task_id = id, completed, changed, "Task completion changed");

    let outcome = if completed {
        Outcome::Completed
    } else {
        Outcome::Reopened
    };
    Ok(found(&outcome.redirect_target()))
}

/// Mark a task completed.
async fn complete_task(
    State(state): State<WebServer>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Response> {
    set_completion(&state, path_task_id(path), true)
}

/// Mark a task not completed.
async fn uncomplete_task(
    State(state): State<WebServer>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Response> {
    set_completion(&state, path_task_id(path), false)
}

/// Delete a task.
async fn delete_task(
    State(state): State<WebServer>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Response> {
    let Some(id) = path_task_id(path) else {
        return Ok(found("/tasks"));
    };

    let changed = state.db().delete_task(id)?;
    info!(task_id = id, changed, "Task deleted");
    Ok(found(&Outcome::Deleted.redirect_target()))
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Turn a handler panic into the generic 500 page.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "Request handler panicked");
    internal_error_response()
}

/// Build the router with all routes.
pub fn build_router(state: WebServer) -> Router {
    Router::new()
        // Page routes
        .route("/", get(root))
        .route("/tasks", get(list_page).post(create_task))
        .route("/tasks/{id}/complete", post(complete_task))
        .route("/tasks/{id}/uncomplete", post(uncomplete_task))
        .route("/tasks/{id}/edit", post(edit_task))
        .route("/tasks/{id}/delete", post(delete_task))
        // API routes
        .route("/api/health", get(health))
        // Add middleware
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the specified address.
///
/// Returns a oneshot sender that can be used to signal shutdown, the actual
/// address the server is bound to, and the server task. The task finishes
/// once in-flight requests have drained after shutdown is signalled.
pub async fn start_server(
    db: Arc<Database>,
    addr: SocketAddr,
) -> anyhow::Result<(oneshot::Sender<()>, SocketAddr, JoinHandle<()>)> {
    let state = WebServer::new(db);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Task list listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Task list server shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr, server))
}
