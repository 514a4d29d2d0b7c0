//! Category routes

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create public routes for the categories feature
///
/// Note: These routes are public (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

/// Create admin routes for category management
///
/// Authentication is applied by the caller.
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/admin/categories", post(handlers::create_category))
        .route(
            "/api/admin/categories/{id}",
            get(handlers::get_category_by_id)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/admin/categories/{id}/descendants",
            get(handlers::list_descendants),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CategoryConfig;
    use crate::core::middleware;
    use crate::features::categories::repositories::InMemoryCategoryRepository;
    use crate::shared::test_helpers::basic_auth_header;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum::middleware::from_fn;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn setup() -> (TestServer, InMemoryCategoryRepository) {
        let repository = InMemoryCategoryRepository::new();
        let service = Arc::new(CategoryService::new(
            Arc::new(repository.clone()),
            CategoryConfig::default(),
        ));

        let app = Router::new()
            .merge(routes(Arc::clone(&service)))
            .merge(admin_routes(service));

        (TestServer::new(app).unwrap(), repository)
    }

    async fn create(server: &TestServer, body: Value) -> Value {
        let response = server.post("/api/admin/categories").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    fn id_of(category: &Value) -> &str {
        category["id"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_by_slug() {
        let (server, _) = setup();

        let created = create(&server, json!({ "name": "Génération de Vidéo" })).await;
        assert_eq!(created["slug"], "generation-de-video");
        assert_eq!(created["parent_id"], Value::Null);

        let response = server.get("/api/categories/generation-de-video").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_get_unknown_slug_returns_404() {
        let (server, _) = setup();

        let response = server.get("/api/categories/nope").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn test_create_validation_errors_return_400() {
        let (server, _) = setup();

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "!!!" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Montage", "slug": "Not Valid" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "description": "no name" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_unknown_parent_returns_422() {
        let (server, _) = setup();

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Montage", "parent_id": Uuid::new_v4() }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cycle_returns_409() {
        let (server, _) = setup();
        let parent = create(&server, json!({ "name": "Montage" })).await;
        let child = create(
            &server,
            json!({ "name": "Sous-titres", "parent_id": parent["id"] }),
        )
        .await;

        let response = server
            .put(&format!("/api/admin/categories/{}", id_of(&parent)))
            .json(&json!({ "parent_id": child["id"] }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);

        let response = server
            .put(&format!("/api/admin/categories/{}", id_of(&parent)))
            .json(&json!({ "parent_id": parent["id"] }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_parent_null_moves_to_root() {
        let (server, _) = setup();
        let parent = create(&server, json!({ "name": "Montage" })).await;
        let child = create(
            &server,
            json!({ "name": "Sous-titres", "parent_id": parent["id"] }),
        )
        .await;

        let response = server
            .put(&format!("/api/admin/categories/{}", id_of(&child)))
            .json(&json!({ "parent_id": null }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["data"]["parent_id"], Value::Null);

        let response = server.get("/api/categories?roots_only=true").await;
        let body = response.json::<Value>();
        assert_eq!(body["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn test_delete_guards_and_success() {
        let (server, repository) = setup();
        let parent = create(&server, json!({ "name": "Montage" })).await;
        let child = create(
            &server,
            json!({ "name": "Sous-titres", "parent_id": parent["id"] }),
        )
        .await;

        let response = server
            .delete(&format!("/api/admin/categories/{}", id_of(&parent)))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        let message = response.json::<Value>()["message"].as_str().unwrap().to_string();
        assert!(message.contains("1 sub-categories"), "{}", message);

        let child_id: Uuid = id_of(&child).parse().unwrap();
        repository.add_tool(child_id).await;
        let response = server
            .delete(&format!("/api/admin/categories/{}", child_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);

        repository.remove_tools(child_id).await;
        let response = server
            .delete(&format!("/api/admin/categories/{}", child_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let response = server
            .get(&format!("/api/admin/categories/{}", child_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_descendants_sorted() {
        let (server, _) = setup();
        let root = create(&server, json!({ "name": "Montage" })).await;
        let child = create(
            &server,
            json!({ "name": "Sous-titres", "parent_id": root["id"] }),
        )
        .await;
        let grandchild = create(
            &server,
            json!({ "name": "Karaoké", "parent_id": child["id"] }),
        )
        .await;

        let response = server
            .get(&format!(
                "/api/admin/categories/{}/descendants",
                id_of(&root)
            ))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();

        let mut expected = vec![id_of(&child).to_string(), id_of(&grandchild).to_string()];
        expected.sort();
        let actual: Vec<String> = body["data"]["descendant_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(body["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn test_list_tree() {
        let (server, _) = setup();
        let root = create(&server, json!({ "name": "Montage" })).await;
        create(
            &server,
            json!({ "name": "Sous-titres", "parent_id": root["id"] }),
        )
        .await;

        let response = server.get("/api/categories?tree=true").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["data"][0]["slug"], "montage");
        assert_eq!(body["data"][0]["children"][0]["slug"], "sous-titres");
    }

    #[tokio::test]
    async fn test_malformed_id_returns_400() {
        let (server, _) = setup();

        let response = server.get("/api/admin/categories/not-a-uuid").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_routes_behind_basic_auth() {
        let repository = InMemoryCategoryRepository::new();
        let service = Arc::new(CategoryService::new(
            Arc::new(repository),
            CategoryConfig::default(),
        ));
        let app = admin_routes(service).layer(from_fn(middleware::basic_auth_middleware(
            Arc::new("admin:secret".to_string()),
            "admin",
        )));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Montage" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        let response = server
            .post("/api/admin/categories")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&basic_auth_header("admin", "wrong")).unwrap(),
            )
            .json(&json!({ "name": "Montage" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let response = server
            .post("/api/admin/categories")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&basic_auth_header("admin", "secret")).unwrap(),
            )
            .json(&json!({ "name": "Montage" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }
}
