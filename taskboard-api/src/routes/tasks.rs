/// Task endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create task
/// - `GET /api/tasks` - List tasks (optional `status`, `priority`, `userId`, `categoryId` filters)
/// - `GET /api/tasks/:id` - Get task
/// - `PUT /api/tasks/:id` - Replace task
/// - `PATCH /api/tasks/:id` - Partially update task
/// - `DELETE /api/tasks/:id` - Delete task
///
/// `status` is one of `PENDING`, `IN_PROGRESS`, `COMPLETED` (default
/// `PENDING`); `priority` is one of `LOW`, `MEDIUM`, `HIGH` (default
/// `MEDIUM`). Any status may follow any other.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::{
        data,
        validation::{
            check_references, non_blank, parse_enum, required, validate_priority,
            validate_status,
        },
        Data,
    },
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::PgPool;
use std::borrow::Cow;
use taskboard_shared::{
    deserializers::double_option,
    models::task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask},
};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Create or replace task request
///
/// On PUT the same rules apply as on POST: absent optional fields fall back
/// to their defaults rather than keeping stored values.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 255, message = "Title must be 1-255 characters")
    )]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,

    #[validate(required(message = "User is required"))]
    pub user_id: Option<Uuid>,

    #[validate(required(message = "Category is required"))]
    pub category_id: Option<Uuid>,
}

impl TaskRequest {
    /// Validates the request, applies defaults and checks that the referenced
    /// user and category exist
    pub async fn into_input(self, db: &PgPool) -> ApiResult<CreateTask> {
        let input = self.into_unchecked_input()?;
        check_references(db, Some(input.user_id), Some(input.category_id)).await?;

        Ok(input)
    }

    /// Trims and validates the request and applies defaults, without
    /// touching the database
    pub fn into_unchecked_input(mut self) -> ApiResult<CreateTask> {
        self.title = non_blank(self.title);
        self.validate()?;

        let input = CreateTask {
            title: required("title", self.title)?,
            description: self.description,
            status: parse_enum::<TaskStatus>("status", self.status.as_deref())?.unwrap_or_default(),
            priority: parse_enum::<TaskPriority>("priority", self.priority.as_deref())?
                .unwrap_or_default(),
            user_id: required("userId", self.user_id)?,
            category_id: required("categoryId", self.category_id)?,
        };

        Ok(input)
    }
}

/// Partial task update request
///
/// Absent fields are left untouched; `"description": null` clears the
/// description. Every other field rejects an explicit `null`, and values
/// follow the same rules as on POST/PUT.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTaskRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub user_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<Uuid>>,
}

impl Validate for PatchTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.title {
            Some(None) => errors.add("title", invalid("not_null", "Title cannot be null")),
            Some(Some(title)) if !(1..=255).contains(&title.trim().chars().count()) => {
                errors.add("title", invalid("length", "Title must be 1-255 characters"))
            }
            _ => {}
        }

        if let Some(Some(description)) = &self.description {
            if description.chars().count() > 2000 {
                errors.add(
                    "description",
                    invalid("length", "Description must be at most 2000 characters"),
                );
            }
        }

        match &self.status {
            Some(None) => errors.add("status", invalid("not_null", "Status cannot be null")),
            Some(Some(status)) => {
                if let Err(error) = validate_status(status) {
                    errors.add("status", error);
                }
            }
            None => {}
        }

        match &self.priority {
            Some(None) => errors.add("priority", invalid("not_null", "Priority cannot be null")),
            Some(Some(priority)) => {
                if let Err(error) = validate_priority(priority) {
                    errors.add("priority", error);
                }
            }
            None => {}
        }

        if let Some(None) = self.user_id {
            errors.add("user_id", invalid("not_null", "User cannot be null"));
        }
        if let Some(None) = self.category_id {
            errors.add("category_id", invalid("not_null", "Category cannot be null"));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

impl PatchTaskRequest {
    /// Validates the request and checks any reference it changes
    pub async fn into_update(self, db: &PgPool) -> ApiResult<UpdateTask> {
        let update = self.into_unchecked_update()?;
        check_references(db, update.user_id, update.category_id).await?;

        Ok(update)
    }

    /// Validates the request without touching the database
    pub fn into_unchecked_update(self) -> ApiResult<UpdateTask> {
        self.validate()?;

        Ok(UpdateTask {
            title: self.title.flatten().map(|title| title.trim().to_string()),
            description: self.description,
            status: parse_enum("status", self.status.flatten().as_deref())?,
            priority: parse_enum("priority", self.priority.flatten().as_deref())?,
            user_id: self.user_id.flatten(),
            category_id: self.category_id.flatten(),
        })
    }
}

/// Query string for `GET /api/tasks`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub user_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl TaskListQuery {
    pub fn into_filter(self) -> ApiResult<TaskFilter> {
        let status = self
            .status
            .map(|s| s.parse::<TaskStatus>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let priority = self
            .priority
            .map(|p| p.parse::<TaskPriority>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(TaskFilter {
            status,
            priority,
            user_id: self.user_id,
            category_id: self.category_id,
        })
    }
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Content-Type: application/json
///
/// {
///   "title": "Tarefa 1",
///   "description": "Descrição",
///   "userId": "uuid",
///   "categoryId": "uuid",
///   "status": "PENDING",
///   "priority": "MEDIUM"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the task, defaults applied.
///
/// # Errors
///
/// - `400 Bad Request`: Body is not JSON
/// - `422 Unprocessable Entity`: Missing title/userId/categoryId, invalid
///   status or priority, unknown user or category
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Data<Task>>)> {
    let input = req.into_input(&state.db).await?;
    let task = Task::create(&state.db, input).await?;

    Ok((StatusCode::CREATED, data(task)))
}

/// List tasks
///
/// # Errors
///
/// - `400 Bad Request`: Unknown status/priority or malformed id in the query
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TaskListQuery>,
) -> ApiResult<Json<Data<Vec<Task>>>> {
    let filter = query.into_filter()?;
    let tasks = Task::list(&state.db, &filter).await?;

    Ok(data(tasks))
}

/// Get a task by id
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: Unknown id
pub async fn get_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Data<Task>>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(data(task))
}

/// Replace a task
///
/// `title`, `userId` and `categoryId` are required. Absent `description`
/// becomes null and absent `status`/`priority` reset to their defaults.
pub async fn replace_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<TaskRequest>,
) -> ApiResult<Json<Data<Task>>> {
    let input = req.into_input(&state.db).await?;

    let task = Task::replace(&state.db, id, input)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(data(task))
}

/// Partially update a task
///
/// `{"status": "COMPLETED"}` changes the status and nothing else.
pub async fn patch_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<PatchTaskRequest>,
) -> ApiResult<Json<Data<Task>>> {
    let update = req.into_update(&state.db).await?;

    let task = Task::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(data(task))
}

/// Delete a task
///
/// Responds `204 No Content`.
pub async fn delete_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
