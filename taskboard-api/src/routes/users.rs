/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/users` - Create user
/// - `GET /api/users` - List users
/// - `GET /api/users/:id` - Get user
/// - `PUT /api/users/:id` - Update user (fields present in the body only)
/// - `DELETE /api/users/:id` - Delete user and their tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::{ApiJson, ApiPath},
    routes::{
        data,
        validation::{non_blank, required},
        Data,
    },
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskboard_shared::models::user::{CreateUser, UpdateUser, User};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 255, message = "Name must be 1-255 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "Invalid email format")
    )]
    pub email: Option<String>,
}

/// Update user request
///
/// Fields left out keep their stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl CreateUserRequest {
    /// Trims and validates the request
    pub fn into_input(mut self) -> ApiResult<CreateUser> {
        self.name = non_blank(self.name);
        self.validate()?;

        Ok(CreateUser {
            name: required("name", self.name)?,
            email: required("email", self.email)?,
        })
    }
}

impl UpdateUserRequest {
    /// Trims and validates the request; an empty body is rejected
    pub fn into_update(mut self) -> ApiResult<UpdateUser> {
        self.name = self.name.map(|name| name.trim().to_string());
        self.validate()?;

        let update = UpdateUser {
            name: self.name,
            email: self.email,
        };

        if update.is_empty() {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail::new(
                "body",
                "At least one of name or email is required",
            )]));
        }

        Ok(update)
    }
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "name": "Ana", "email": "ana@ex.com" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "data": { "id": "uuid", "name": "Ana", "email": "ana@ex.com", "createdAt": "...", "updatedAt": "..." } }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Missing name/email or invalid email
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Data<User>>)> {
    let user = User::create(&state.db, req.into_input()?).await?;

    Ok((StatusCode::CREATED, data(user)))
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Data<Vec<User>>>> {
    let users = User::list(&state.db).await?;
    Ok(data(users))
}

/// Get a user by id
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: Unknown id
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Data<User>>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(data(user))
}

/// Update a user
///
/// Only the fields present in the body change; `{"name": "Carlos Silva"}`
/// keeps the stored email.
///
/// # Errors
///
/// - `404 Not Found`: Unknown id
/// - `409 Conflict`: Email already used by another user
/// - `422 Unprocessable Entity`: Empty body or invalid fields
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<Data<User>>> {
    let update = req.into_update()?;

    let user = User::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(data(user))
}

/// Delete a user
///
/// Responds `204 No Content`. The user's tasks are deleted with them.
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
