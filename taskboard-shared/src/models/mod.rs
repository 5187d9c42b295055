/// Database models for Taskboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: People who own tasks
/// - `category`: Groupings of tasks
/// - `task`: Work items with status and priority
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Ana".to_string(),
///     email: "ana@ex.com".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod task;
pub mod user;
