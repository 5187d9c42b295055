/// Category pages
///
/// # Routes
///
/// - `GET /categories` - Table of categories
/// - `GET /categories/new` - Create form
/// - `POST /categories` - Create, then back to the table
/// - `GET /categories/:id/edit` - Edit form
/// - `POST /categories/:id` - Update, then back to the table
/// - `POST /categories/:id/delete` - Delete with its tasks, then back to the table

use crate::{
    app::AppState,
    error::ApiError,
    routes::categories::CategoryRequest,
    views::{error_page, form_errors, form_status, render, see_other},
};
use askama::Template;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
    Form,
};
use serde::Deserialize;
use taskboard_shared::{
    deserializers::empty_string_as_none,
    models::category::{Category, CategoryWithTasks},
};
use uuid::Uuid;

const LIST_PATH: &str = "/categories";
const LOAD_ERROR: &str = "Erro ao carregar categorias";
const SAVE_ERROR: &str = "Erro ao salvar categoria";

#[derive(Template)]
#[template(path = "categories/list.html")]
pub struct CategoriesPage {
    /// Empty unless loading failed
    pub error: String,
    pub rows: Vec<CategoryRow>,
}

pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub task_count: usize,
}

impl From<CategoryWithTasks> for CategoryRow {
    fn from(value: CategoryWithTasks) -> Self {
        Self {
            id: value.category.id,
            name: value.category.name,
            description: value.category.description.unwrap_or_default(),
            task_count: value.tasks.len(),
        }
    }
}

#[derive(Template)]
#[template(path = "categories/form.html")]
pub struct CategoryFormPage {
    pub heading: &'static str,
    pub action: String,
    pub name: String,
    pub description: String,
    pub submit_label: &'static str,
    pub errors: Vec<String>,
}

impl CategoryFormPage {
    fn create(form: CategoryForm, errors: Vec<String>) -> Self {
        Self {
            heading: "Nova Categoria",
            action: LIST_PATH.to_string(),
            name: form.name,
            description: form.description.unwrap_or_default(),
            submit_label: "Criar",
            errors,
        }
    }

    fn edit(id: Uuid, form: CategoryForm, errors: Vec<String>) -> Self {
        Self {
            heading: "Editar Categoria",
            action: format!("{LIST_PATH}/{id}"),
            name: form.name,
            description: form.description.unwrap_or_default(),
            submit_label: "Atualizar",
            errors,
        }
    }
}

/// Submitted category form
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

impl CategoryForm {
    fn to_request(&self) -> CategoryRequest {
        let name = self.name.trim();
        CategoryRequest {
            name: (!name.is_empty()).then(|| name.to_string()),
            description: self.description.clone(),
        }
    }
}

impl From<Category> for CategoryForm {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            description: category.description,
        }
    }
}

fn not_found() -> Response {
    error_page(
        StatusCode::NOT_FOUND,
        "Categoria não encontrada",
        "A categoria solicitada não existe.",
        LIST_PATH,
    )
}

/// `GET /categories`
///
/// A failed load still renders the page, with the error in place of the table.
pub async fn list_page(State(state): State<AppState>) -> Response {
    let page = match Category::list_with_tasks(&state.db).await {
        Ok(categories) => CategoriesPage {
            error: String::new(),
            rows: categories.into_iter().map(CategoryRow::from).collect(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load categories");
            CategoriesPage {
                error: LOAD_ERROR.to_string(),
                rows: Vec::new(),
            }
        }
    };

    render(StatusCode::OK, &page)
}

/// `GET /categories/new`
pub async fn new_page() -> Response {
    render(
        StatusCode::OK,
        &CategoryFormPage::create(CategoryForm::default(), Vec::new()),
    )
}

/// `POST /categories`
pub async fn create(State(state): State<AppState>, Form(form): Form<CategoryForm>) -> Response {
    let result = match form.to_request().into_input() {
        Ok(input) => Category::create(&state.db, input)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => see_other(LIST_PATH),
        Err(e) => render(
            form_status(&e),
            &CategoryFormPage::create(form, form_errors(&e, SAVE_ERROR)),
        ),
    }
}

/// `GET /categories/:id/edit`
pub async fn edit_page(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = path else {
        return not_found();
    };

    match Category::find_by_id(&state.db, id).await {
        Ok(Some(category)) => render(
            StatusCode::OK,
            &CategoryFormPage::edit(id, category.into(), Vec::new()),
        ),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!(category_id = %id, error = %e, "Failed to load category");
            let status = ApiError::from(e).status_code();
            error_page(status, "Erro", "Erro ao carregar categoria", LIST_PATH)
        }
    }
}

/// `POST /categories/:id`
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let Ok(Path(id)) = path else {
        return not_found();
    };

    let result = match form.to_request().into_input() {
        Ok(input) => Category::replace(&state.db, id, input)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(Some(_)) => see_other(LIST_PATH),
        Ok(None) => not_found(),
        Err(e) => render(
            form_status(&e),
            &CategoryFormPage::edit(id, form, form_errors(&e, SAVE_ERROR)),
        ),
    }
}

/// `POST /categories/:id/delete`
///
/// Deleting a category that is already gone still lands on the table.
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = path else {
        return not_found();
    };

    match Category::delete(&state.db, id).await {
        Ok(_) => see_other(LIST_PATH),
        Err(e) => {
            tracing::error!(category_id = %id, error = %e, "Failed to delete category");
            let status = ApiError::from(e).status_code();
            error_page(status, "Erro", "Erro ao excluir categoria", LIST_PATH)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, description: &str) -> CategoryRow {
        CategoryRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            task_count: 0,
        }
    }

    #[test]
    fn test_list_renders_rows_and_actions() {
        let casa = row("Casa", "Limpar o quarto");
        let id = casa.id;
        let html = CategoriesPage {
            error: String::new(),
            rows: vec![casa, row("Trabalho", "")],
        }
        .render()
        .unwrap();

        assert!(html.contains("<h1>Categorias</h1>"));
        assert!(html.contains("Adicionar Categoria"));
        assert!(html.contains("<td>Casa</td>"));
        assert!(html.contains("<td>Limpar o quarto</td>"));
        assert!(html.contains("<td>Trabalho</td>"));
        assert!(html.contains(&format!(r#"action="/categories/{id}/edit""#)));
        assert!(html.contains(&format!(r#"action="/categories/{id}/delete""#)));
        assert_eq!(html.matches(">Editar</button>").count(), 2);
        assert_eq!(html.matches(">Excluir</button>").count(), 2);
        assert!(html.contains("data-confirm="));
        assert!(!html.contains("Erro ao carregar categorias"));
    }

    #[test]
    fn test_list_renders_load_error() {
        let html = CategoriesPage {
            error: LOAD_ERROR.to_string(),
            rows: Vec::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Erro ao carregar categorias"));
        assert!(!html.contains("<tbody>"));
    }

    #[test]
    fn test_list_escapes_names() {
        let html = CategoriesPage {
            error: String::new(),
            rows: vec![row("<script>alert(1)</script>", "")],
        }
        .render()
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_create_form_labels() {
        let html = CategoryFormPage::create(CategoryForm::default(), Vec::new())
            .render()
            .unwrap();

        assert!(html.contains(r#"<label for="name">Nome:</label>"#));
        assert!(html.contains(r#"<label for="description">Descrição:</label>"#));
        assert!(html.contains(r#"action="/categories""#));
        assert!(html.contains(">Criar</button>"));
    }

    #[test]
    fn test_edit_form_prefilled() {
        let id = Uuid::new_v4();
        let form = CategoryForm {
            name: "Casa".to_string(),
            description: Some("Limpar o quarto".to_string()),
        };
        let html = CategoryFormPage::edit(id, form, vec!["Name is required".to_string()])
            .render()
            .unwrap();

        assert!(html.contains(r#"value="Casa""#));
        assert!(html.contains(">Limpar o quarto</textarea>"));
        assert!(html.contains(&format!(r#"action="/categories/{id}""#)));
        assert!(html.contains(">Atualizar</button>"));
        assert!(html.contains("<li>Name is required</li>"));
    }

    #[test]
    fn test_form_to_request_treats_blank_name_as_missing() {
        let form: CategoryForm =
            serde_json::from_str(r#"{"name": "   ", "description": ""}"#).unwrap();
        let request = form.to_request();
        assert!(request.name.is_none());
        assert!(request.description.is_none());

        let ApiError::ValidationError(details) = request.into_input().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(details[0].field, "name");
    }
}
