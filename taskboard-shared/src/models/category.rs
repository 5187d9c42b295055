/// Category model and database operations
///
/// Categories group tasks. Names are free text and need not be unique.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use crate::models::task::{Task, TaskFilter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Category of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,

    pub name: String,

    pub description: Option<String>,

    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A category together with the tasks filed under it
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithTasks {
    #[serde(flatten)]
    pub category: Category,

    pub tasks: Vec<Task>,
}

/// Input for creating a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Full replacement of a category's mutable fields
///
/// A `None` description clears the stored one.
pub type ReplaceCategory = CreateCategory;

impl Category {
    /// Creates a new category
    pub async fn create(pool: &PgPool, data: CreateCategory) -> Result<Self, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Finds a category by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Finds a category by ID and loads its tasks
    pub async fn find_with_tasks(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CategoryWithTasks>, sqlx::Error> {
        let Some(category) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let tasks = Task::list_by_category(pool, id).await?;

        Ok(Some(CategoryWithTasks { category, tasks }))
    }

    /// Checks whether a category with this ID exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists all categories, oldest first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }

    /// Lists all categories with their tasks
    ///
    /// Two queries regardless of the number of categories, both reading the
    /// same snapshot.
    pub async fn list_with_tasks(pool: &PgPool) -> Result<Vec<CategoryWithTasks>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let categories = Self::list(&mut *tx).await?;
        let tasks = Task::list(&mut *tx, &TaskFilter::default()).await?;
        tx.commit().await?;

        Ok(group_tasks(categories, tasks))
    }

    /// Replaces name and description of an existing category
    ///
    /// # Returns
    ///
    /// The updated category, or None if it doesn't exist
    pub async fn replace(
        pool: &PgPool,
        id: Uuid,
        data: ReplaceCategory,
    ) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2,
                description = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        if category.is_some() {
            tracing::info!(category_id = %id, "Category updated");
        }
        Ok(category)
    }

    /// Deletes a category and the tasks filed under it
    ///
    /// # Returns
    ///
    /// True if the category was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(category_id = %id, "Category deleted");
        }
        Ok(deleted)
    }
}

/// Attaches each task to its category, keeping both input orders
fn group_tasks(categories: Vec<Category>, tasks: Vec<Task>) -> Vec<CategoryWithTasks> {
    let mut by_category: HashMap<Uuid, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_category.entry(task.category_id).or_default().push(task);
    }

    categories
        .into_iter()
        .map(|category| {
            let tasks = by_category.remove(&category.id).unwrap_or_default();
            CategoryWithTasks { category, tasks }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(title: &str, category_id: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            user_id: Uuid::new_v4(),
            category_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_tasks_attaches_by_category() {
        let casa = category("Casa");
        let trabalho = category("Trabalho");
        let vazia = category("Vazia");

        let tasks = vec![
            task("Limpar o quarto", casa.id),
            task("Relatório", trabalho.id),
            task("Lavar louça", casa.id),
        ];

        let grouped = group_tasks(vec![casa, trabalho, vazia], tasks);

        assert_eq!(grouped.len(), 3);
        let titles: Vec<&str> = grouped[0].tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Limpar o quarto", "Lavar louça"]);
        assert_eq!(grouped[1].tasks.len(), 1);
        assert!(grouped[2].tasks.is_empty());
    }

    #[test]
    fn test_category_with_tasks_flattens() {
        let casa = category("Casa");
        let json = serde_json::to_value(CategoryWithTasks {
            category: casa,
            tasks: vec![],
        })
        .unwrap();

        assert_eq!(json["name"], "Casa");
        assert!(json["description"].is_null());
        assert!(json["createdAt"].is_string());
        assert_eq!(json["tasks"], serde_json::json!([]));
    }
}
