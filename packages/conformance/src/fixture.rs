//! An in-process API serving the style guide's example responses.
//!
//! Routes under `/v1/users` follow the conventions; routes under
//! `/v1/broken` each break exactly one of them.
//!
//! | Route | Status | Body |
//! |-------|--------|------|
//! | `GET /v1/users` | 200 | paginated envelope |
//! | `GET /v1/users/1` | 200 | success envelope |
//! | `GET /v1/users/{other}` | 404 | error envelope |
//! | `DELETE /v1/users/{id}` | 204 | empty |
//! | `POST /v1/users` | 422 | error envelope with an `errors` array |
//! | `GET /v1/legacy/users` | 200 | bare `{data, metadata}` envelope |
//! | `GET /v1/broken/naming` | 200 | snake_case keys inside `data` |
//! | `GET /v1/broken/code` | 404 | body `code` says 200 |
//! | `GET /v1/broken/shape` | 200 | no `success` discriminator |
//! | `GET /v1/broken/pagination` | 200 | pagination with string counts |
//! | `GET /v1/broken/teapot` | 418 | error envelope, status not in the table |
//! | `GET /v1/broken/text` | 200 | plain text, not JSON |

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

/// Start the fixture API on an ephemeral port and return its base URL,
/// e.g. `http://127.0.0.1:51234`.
///
/// The server runs in a background `tokio` task for the rest of the process.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the server fails to start.
pub async fn spawn_fixture_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router())
            .await
            .expect("fixture api error");
    });

    format!("http://{addr}")
}

fn router() -> Router {
    Router::new()
        .route("/v1/users", get(list_users).post(create_user))
        .route("/v1/users/{id}", get(get_user).delete(delete_user))
        .route("/v1/legacy/users", get(legacy_users))
        .route("/v1/broken/naming", get(broken_naming))
        .route("/v1/broken/code", get(broken_code))
        .route("/v1/broken/shape", get(broken_shape))
        .route("/v1/broken/pagination", get(broken_pagination))
        .route("/v1/broken/teapot", get(teapot))
        .route("/v1/broken/text", get(plain_text))
}

// --- conformant --------------------------------------------------------------

async fn list_users() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "code": 200,
        "data": [
            { "id": 6, "firstName": "Ada", "lastName": "Lovelace" },
            { "id": 7, "firstName": "Alan", "lastName": "Turing" }
        ],
        "metadata": {
            "pagination": { "count": 5, "total": 618, "currentPage": 2, "totalPages": 124 }
        }
    }))
}

async fn get_user(Path(id): Path<String>) -> Response {
    if id == "1" {
        Json(json!({
            "success": true,
            "code": 200,
            "data": { "id": 1, "firstName": "Ada", "ownerId": 3 }
        }))
        .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "code": 404,
                "message": "Not Found",
                "errors": {}
            })),
        )
            .into_response()
    }
}

async fn create_user() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "success": false,
            "code": 422,
            "message": "Unprocessable Entity",
            "errors": [
                { "field": "email", "message": "has already been taken" }
            ]
        })),
    )
        .into_response()
}

async fn delete_user(Path(_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn legacy_users() -> Json<serde_json::Value> {
    Json(json!({
        "data": [{ "id": 1 }],
        "metadata": {
            "pagination": { "count": 1, "total": 1, "currentPage": 1, "totalPages": 1 }
        }
    }))
}

// --- broken ------------------------------------------------------------------

async fn broken_naming() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "code": 200,
        "data": { "owner_id": 3 }
    }))
}

async fn broken_code() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "code": 200,
            "message": "Not Found",
            "errors": {}
        })),
    )
        .into_response()
}

async fn broken_shape() -> Json<serde_json::Value> {
    Json(json!({ "result": { "id": 1 } }))
}

async fn broken_pagination() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "code": 200,
        "data": [],
        "metadata": {
            "pagination": { "count": "5", "total": 618, "currentPage": 2, "totalPages": 124 }
        }
    }))
}

async fn teapot() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({
            "success": false,
            "code": 418,
            "message": "I'm a teapot",
            "errors": {}
        })),
    )
        .into_response()
}

async fn plain_text() -> &'static str {
    "everything is fine"
}
