/// Task pages
///
/// # Routes
///
/// - `GET /tasks` - Table of tasks with owner and category names
/// - `GET /tasks/new` - Create form
/// - `POST /tasks` - Create, then back to the table
/// - `POST /tasks/:id/delete` - Delete, then back to the table

use crate::{
    app::AppState,
    error::ApiError,
    routes::tasks::TaskRequest,
    views::{error_page, form_errors, form_status, render, see_other, SelectOption},
};
use askama::Template;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
    Form,
};
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use taskboard_shared::{
    deserializers::empty_string_as_none,
    models::{
        category::Category,
        task::{Task, TaskPriority, TaskStatus},
        user::User,
    },
};
use uuid::Uuid;

const LIST_PATH: &str = "/tasks";
const LOAD_ERROR: &str = "Erro ao carregar tarefas";
const CHOICES_ERROR: &str = "Erro ao carregar usuários e categorias";
const SAVE_ERROR: &str = "Erro ao salvar tarefa";

#[derive(Template)]
#[template(path = "tasks/list.html")]
pub struct TasksPage {
    /// Empty unless loading failed
    pub error: String,
    pub rows: Vec<TaskRow>,
}

pub struct TaskRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: &'static str,
    pub priority: &'static str,
    pub user_name: String,
    pub category_name: String,
}

#[derive(Template)]
#[template(path = "tasks/form.html")]
pub struct TaskFormPage {
    pub title: String,
    pub description: String,
    pub users: Vec<SelectOption>,
    pub categories: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub priorities: Vec<SelectOption>,
    pub errors: Vec<String>,
}

impl TaskFormPage {
    fn new(form: &TaskForm, users: &[User], categories: &[Category], errors: Vec<String>) -> Self {
        let status = form
            .status
            .as_deref()
            .unwrap_or(TaskStatus::default().as_str());
        let priority = form
            .priority
            .as_deref()
            .unwrap_or(TaskPriority::default().as_str());

        Self {
            title: form.title.clone(),
            description: form.description.clone().unwrap_or_default(),
            users: users
                .iter()
                .map(|u| {
                    let value = u.id.to_string();
                    let selected = form.user_id.as_deref() == Some(value.as_str());
                    SelectOption::new(value, u.name.as_str(), selected)
                })
                .collect(),
            categories: categories
                .iter()
                .map(|c| {
                    let value = c.id.to_string();
                    let selected = form.category_id.as_deref() == Some(value.as_str());
                    SelectOption::new(value, c.name.as_str(), selected)
                })
                .collect(),
            statuses: TaskStatus::ALL
                .iter()
                .map(|s| SelectOption::new(s.as_str(), s.label(), s.as_str() == status))
                .collect(),
            priorities: TaskPriority::ALL
                .iter()
                .map(|p| SelectOption::new(p.as_str(), p.label(), p.as_str() == priority))
                .collect(),
            errors,
        }
    }
}

/// Submitted task form
///
/// Ids arrive as text so a tampered value reads as "not selected" instead of
/// rejecting the whole form.
#[derive(Debug, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub user_id: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category_id: Option<String>,
}

impl TaskForm {
    fn to_request(&self) -> TaskRequest {
        let title = self.title.trim();
        TaskRequest {
            title: (!title.is_empty()).then(|| title.to_string()),
            description: self.description.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            user_id: self.user_id.as_deref().and_then(|id| id.parse().ok()),
            category_id: self.category_id.as_deref().and_then(|id| id.parse().ok()),
        }
    }
}

/// Joins tasks with the names of their user and category
fn task_rows(tasks: Vec<Task>, users: &[User], categories: &[Category]) -> Vec<TaskRow> {
    let user_names: HashMap<Uuid, &str> =
        users.iter().map(|u| (u.id, u.name.as_str())).collect();
    let category_names: HashMap<Uuid, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    tasks
        .into_iter()
        .map(|task| TaskRow {
            id: task.id,
            user_name: user_names.get(&task.user_id).copied().unwrap_or_default().to_string(),
            category_name: category_names
                .get(&task.category_id)
                .copied()
                .unwrap_or_default()
                .to_string(),
            title: task.title,
            description: task.description.unwrap_or_default(),
            status: task.status.label(),
            priority: task.priority.label(),
        })
        .collect()
}

async fn load_choices(db: &PgPool) -> Result<(Vec<User>, Vec<Category>), sqlx::Error> {
    let users = User::list(db).await?;
    let categories = Category::list(db).await?;
    Ok((users, categories))
}

/// Renders the form, reporting a failed choices load above it
async fn form_page(db: &PgPool, status: StatusCode, form: &TaskForm, mut errors: Vec<String>) -> Response {
    let (users, categories) = match load_choices(db).await {
        Ok(choices) => choices,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load users and categories");
            errors.push(CHOICES_ERROR.to_string());
            (Vec::new(), Vec::new())
        }
    };

    render(status, &TaskFormPage::new(form, &users, &categories, errors))
}

/// `GET /tasks`
///
/// A failed load still renders the page, with the error in place of the table.
pub async fn list_page(State(state): State<AppState>) -> Response {
    let loaded = async {
        let tasks = Task::list(&state.db, &Default::default()).await?;
        let (users, categories) = load_choices(&state.db).await?;
        Ok::<_, sqlx::Error>(task_rows(tasks, &users, &categories))
    }
    .await;

    let page = match loaded {
        Ok(rows) => TasksPage {
            error: String::new(),
            rows,
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load tasks");
            TasksPage {
                error: LOAD_ERROR.to_string(),
                rows: Vec::new(),
            }
        }
    };

    render(StatusCode::OK, &page)
}

/// `GET /tasks/new`
pub async fn new_page(State(state): State<AppState>) -> Response {
    form_page(&state.db, StatusCode::OK, &TaskForm::default(), Vec::new()).await
}

/// `POST /tasks`
pub async fn create(State(state): State<AppState>, Form(form): Form<TaskForm>) -> Response {
    let result = match form.to_request().into_input(&state.db).await {
        Ok(input) => Task::create(&state.db, input).await.map_err(ApiError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => see_other(LIST_PATH),
        Err(e) => {
            form_page(&state.db, form_status(&e), &form, form_errors(&e, SAVE_ERROR)).await
        }
    }
}

/// `POST /tasks/:id/delete`
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = path else {
        return error_page(
            StatusCode::NOT_FOUND,
            "Tarefa não encontrada",
            "A tarefa solicitada não existe.",
            LIST_PATH,
        );
    };

    match Task::delete(&state.db, id).await {
        Ok(_) => see_other(LIST_PATH),
        Err(e) => {
            tracing::error!(task_id = %id, error = %e, "Failed to delete task");
            let status = ApiError::from(e).status_code();
            error_page(status, "Erro", "Erro ao excluir tarefa", LIST_PATH)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@ex.com", name.to_lowercase()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_rows_join_names() {
        let ana = user("Ana");
        let casa = category("Casa");
        let task = Task {
            id: Uuid::new_v4(),
            title: "Limpar o quarto".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            user_id: ana.id,
            category_id: casa.id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let rows = task_rows(vec![task], &[ana], &[casa]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_name, "Ana");
        assert_eq!(rows[0].category_name, "Casa");
        assert_eq!(rows[0].status, "Em andamento");
        assert_eq!(rows[0].priority, "Alta");
        assert_eq!(rows[0].description, "");
    }

    #[test]
    fn test_list_renders_rows() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            title: "Tarefa 1".to_string(),
            description: "Descrição".to_string(),
            status: TaskStatus::Pending.label(),
            priority: TaskPriority::Medium.label(),
            user_name: "Ana".to_string(),
            category_name: "Casa".to_string(),
        };
        let id = row.id;
        let html = TasksPage {
            error: String::new(),
            rows: vec![row],
        }
        .render()
        .unwrap();

        assert!(html.contains("<h1>Tarefas</h1>"));
        assert!(html.contains("Adicionar Tarefa"));
        assert!(html.contains("<td>Tarefa 1</td>"));
        assert!(html.contains("<td>Pendente</td>"));
        assert!(html.contains("<td>Média</td>"));
        assert!(html.contains("<td>Ana</td>"));
        assert!(html.contains("<td>Casa</td>"));
        assert!(html.contains(&format!(r#"action="/tasks/{id}/delete""#)));
        assert!(html.contains("data-confirm="));
    }

    #[test]
    fn test_list_renders_load_error() {
        let html = TasksPage {
            error: LOAD_ERROR.to_string(),
            rows: Vec::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Erro ao carregar tarefas"));
        assert!(!html.contains("<tbody>"));
    }

    #[test]
    fn test_form_has_placeholders_and_one_option_per_choice() {
        let users = vec![user("Ana"), user("Bruno")];
        let categories = vec![category("Casa")];
        let html = TaskFormPage::new(&TaskForm::default(), &users, &categories, Vec::new())
            .render()
            .unwrap();

        assert!(html.contains(r#"<label for="title">Título:</label>"#));
        assert!(html.contains(r#"<label for="description">Descrição:</label>"#));
        assert!(html.contains(r#"<select id="user" name="user_id" required>"#));
        assert!(html.contains(r#"<select id="category" name="category_id" required>"#));
        assert!(html.contains(r#"<option value="">Selecione um usuário</option>"#));
        assert!(html.contains(r#"<option value="">Selecione uma categoria</option>"#));
        assert!(html.contains(&format!(r#"<option value="{}">Ana</option>"#, users[0].id)));
        assert!(html.contains(&format!(r#"<option value="{}">Bruno</option>"#, users[1].id)));
        assert!(html.contains(&format!(r#"<option value="{}">Casa</option>"#, categories[0].id)));
        assert!(html.contains(r#"<option value="PENDING" selected>Pendente</option>"#));
        assert!(html.contains(r#"<option value="MEDIUM" selected>Média</option>"#));
        assert!(html.contains(">Criar</button>"));
    }

    #[test]
    fn test_form_keeps_submitted_choices() {
        let ana = user("Ana");
        let form = TaskForm {
            title: "Tarefa 1".to_string(),
            status: Some("COMPLETED".to_string()),
            priority: Some("HIGH".to_string()),
            user_id: Some(ana.id.to_string()),
            ..Default::default()
        };

        let page = TaskFormPage::new(&form, &[ana], &[], vec!["Category is required".to_string()]);

        assert!(page.users[0].selected);
        assert!(page.statuses.iter().any(|s| s.value == "COMPLETED" && s.selected));
        assert!(page.priorities.iter().any(|p| p.value == "HIGH" && p.selected));
        assert_eq!(page.statuses.iter().filter(|s| s.selected).count(), 1);

        let html = page.render().unwrap();
        assert!(html.contains(r#"value="Tarefa 1""#));
        assert!(html.contains("<li>Category is required</li>"));
    }

    #[test]
    fn test_form_to_request() {
        let category_id = Uuid::new_v4();
        let form = TaskForm {
            title: "  ".to_string(),
            user_id: Some("not-a-uuid".to_string()),
            category_id: Some(category_id.to_string()),
            ..Default::default()
        };

        let request = form.to_request();
        assert!(request.title.is_none());
        assert!(request.user_id.is_none());
        assert_eq!(request.category_id, Some(category_id));
    }
}
