/// Category endpoints
///
/// # Endpoints
///
/// - `POST /api/categories` - Create category
/// - `GET /api/categories` - List categories with their tasks
/// - `GET /api/categories/:id` - Get category with its tasks
/// - `PUT /api/categories/:id` - Replace name and description
/// - `DELETE /api/categories/:id` - Delete category and its tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{
        data,
        validation::{non_blank, required},
        Data,
    },
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskboard_shared::models::category::{Category, CategoryWithTasks, CreateCategory};
use uuid::Uuid;
use validator::Validate;

/// Create or replace category request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 255, message = "Name must be 1-255 characters")
    )]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl CategoryRequest {
    /// Validates the request and converts it into model input
    ///
    /// The name is trimmed first, so a blank name counts as missing.
    pub fn into_input(mut self) -> ApiResult<CreateCategory> {
        self.name = non_blank(self.name);
        self.validate()?;

        Ok(CreateCategory {
            name: required("name", self.name)?,
            description: self.description,
        })
    }
}

/// Create a category
///
/// # Endpoint
///
/// ```text
/// POST /api/categories
/// Content-Type: application/json
///
/// { "name": "Casa", "description": "Limpar o quarto" }
/// ```
///
/// # Response
///
/// `201 Created` with the category, including server-assigned `id` and `createdAt`.
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Data<Category>>)> {
    let input = req.into_input()?;
    let category = Category::create(&state.db, input).await?;

    Ok((StatusCode::CREATED, data(category)))
}

/// List categories, each with its `tasks`
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<CategoryWithTasks>>>> {
    let categories = Category::list_with_tasks(&state.db).await?;
    Ok(data(categories))
}

/// Get a category with its `tasks`
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Data<CategoryWithTasks>>> {
    let category = Category::find_with_tasks(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(data(category))
}

/// Replace a category
///
/// `name` is required; a missing `description` clears the stored one.
pub async fn replace_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> ApiResult<Json<Data<Category>>> {
    let input = req.into_input()?;

    let category = Category::replace(&state.db, id, input)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(data(category))
}

/// Delete a category
///
/// Responds `204 No Content`. Tasks filed under the category are deleted too.
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Category::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
