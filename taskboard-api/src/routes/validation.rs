//! Validators and reference checks shared by the users, categories and
//! tasks handlers (and the HTML forms built on them).

use crate::error::{ApiError, ApiResult, ValidationErrorDetail};
use sqlx::PgPool;
use std::borrow::Cow;
use taskboard_shared::models::{
    category::Category,
    task::{TaskPriority, TaskStatus},
    user::User,
};
use uuid::Uuid;
use validator::ValidationError;

/// `validator` hook for `status` fields
pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<TaskStatus>()
        .map(|_| ())
        .map_err(|e| invalid_enum(e.to_string()))
}

/// `validator` hook for `priority` fields
pub fn validate_priority(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<TaskPriority>()
        .map(|_| ())
        .map_err(|e| invalid_enum(e.to_string()))
}

fn invalid_enum(message: String) -> ValidationError {
    let mut error = ValidationError::new("invalid_enum");
    error.message = Some(Cow::Owned(message));
    error
}

/// Parses an already validated optional enum field
pub fn parse_enum<T>(field: &str, value: Option<&str>) -> ApiResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| raw.parse::<T>())
        .transpose()
        .map_err(|e| ApiError::ValidationError(vec![ValidationErrorDetail::new(field, e.to_string())]))
}

/// Unwraps a field that `#[validate(required)]` has already checked
pub fn required<T>(field: &str, value: Option<T>) -> ApiResult<T> {
    value.ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(
            field,
            format!("{} is required", field),
        )])
    })
}

/// Trims a text field; a blank value counts as missing
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks that the referenced user and category exist
///
/// Both references are checked so the caller sees every problem at once.
pub async fn check_references(
    db: &PgPool,
    user_id: Option<Uuid>,
    category_id: Option<Uuid>,
) -> ApiResult<()> {
    let mut errors = Vec::new();

    if let Some(user_id) = user_id {
        if !User::exists(db, user_id).await? {
            errors.push(ValidationErrorDetail::new("userId", "User not found"));
        }
    }

    if let Some(category_id) = category_id {
        if !Category::exists(db, category_id).await? {
            errors.push(ValidationErrorDetail::new("categoryId", "Category not found"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationError(errors))
    }
}
