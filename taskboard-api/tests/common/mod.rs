//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Test database setup (migrations applied once per context)
//! - Test user/category creation
//! - Request helpers returning status and parsed body
//!
//! Tests need a PostgreSQL database in `DATABASE_URL`. Without one,
//! `TestContext::new` returns `None` and the test returns early.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::db::{migrations::run_migrations, pool::create_pool};
use taskboard_shared::models::category::{Category, CreateCategory};
use taskboard_shared::models::user::{CreateUser, User};
use tower::ServiceExt;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Connects to `DATABASE_URL` and applies migrations
    pub async fn new() -> Option<Self> {
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        }

        let config = Config::from_env().expect("test configuration");
        let db = create_pool(config.database.pool_config())
            .await
            .expect("test database");
        run_migrations(&db).await.expect("migrations");

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Some(TestContext { db, app, config })
    }

    /// Sends a request with an optional JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Sends a urlencoded form post, returning status, `Location` and body
    pub async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Fetches a page as text
    pub async fn get_page(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

/// Unique email so tests can share one database
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

/// Helper to create a test user
pub async fn create_test_user(ctx: &TestContext, name: &str) -> User {
    User::create(
        &ctx.db,
        CreateUser {
            name: name.to_string(),
            email: unique_email(&name.to_lowercase().replace(' ', ".")),
        },
    )
    .await
    .unwrap()
}

/// Helper to create a test category
pub async fn create_test_category(ctx: &TestContext, name: &str) -> Category {
    Category::create(
        &ctx.db,
        CreateCategory {
            name: format!("{} {}", name, Uuid::new_v4()),
            description: None,
        },
    )
    .await
    .unwrap()
}
