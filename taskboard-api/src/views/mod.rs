/// Server-rendered pages
///
/// The browser frontend is plain HTML rendered with askama templates from
/// `templates/`. Pages read and write through the same models as the JSON
/// API and reuse its request validation, so both surfaces accept and reject
/// the same input.
///
/// - `categories`: `/categories` list, create, edit and delete
/// - `tasks`: `/tasks` list, create and delete
///
/// Forms post back with `application/x-www-form-urlencoded` and a successful
/// write answers `303 See Other` to the list page.

pub mod categories;
pub mod tasks;

use crate::error::ApiError;
use askama::Template;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

/// Full page error, e.g. editing a category that no longer exists
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub heading: String,
    pub message: String,
    pub back_href: &'static str,
}

/// `<option>` of a `<select>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Renders a template with the given status
///
/// A template that fails to render produces a bare 500 page.
pub fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Template rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Erro interno</h1>".to_string()),
            )
                .into_response()
        }
    }
}

/// Renders the error page
pub fn error_page(
    status: StatusCode,
    heading: &str,
    message: &str,
    back_href: &'static str,
) -> Response {
    render(
        status,
        &ErrorPage {
            heading: heading.to_string(),
            message: message.to_string(),
            back_href,
        },
    )
}

/// Redirect after a successful form post
pub fn see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}

/// Messages to show above a form for a failed write
///
/// Validation failures list one message per field; anything else collapses
/// into `fallback` so storage errors never reach the page.
pub fn form_errors(err: &ApiError, fallback: &str) -> Vec<String> {
    match err {
        ApiError::ValidationError(details) => {
            details.iter().map(|d| d.message.clone()).collect()
        }
        ApiError::Conflict(message) => vec![message.clone()],
        other => {
            tracing::warn!(error = %other, "Form submission failed");
            vec![fallback.to_string()]
        }
    }
}

/// Status for a form re-rendered after a failed write
pub fn form_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::ValidationError(_) | ApiError::BadRequest(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        other => other.status_code(),
    }
}

/// `GET /` lands on the task list
pub async fn index() -> Redirect {
    Redirect::to("/tasks")
}

/// `GET /assets/app.js`
///
/// Wires the `data-confirm` dialogs on delete buttons.
pub async fn app_js() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        include_str!("../../assets/app.js"),
    )
}
