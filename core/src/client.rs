//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The round-trip itself belongs to a `Transport`.
//!
//! The collection lives at `{base}/` and items at `{base}/{id}/`; the
//! trailing slashes are part of the resource paths.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.collection_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.collection_url(),
            headers: json_headers(),
            body: Some(encode(input)?),
        })
    }

    pub fn build_update_todo(&self, id: TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.item_url(id),
            headers: json_headers(),
            body: Some(encode(input)?),
        })
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_success(&response)?;
        decode(&response.body)
    }

    /// Any 2xx is a success; deployments differ on the create status.
    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_success(&response)?;
        decode(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_success(&response)?;
        decode(&response.body)
    }

    /// 204 is an empty success. Any other 2xx must still carry valid JSON,
    /// which is read and dropped.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        if response.status == 204 {
            return Ok(());
        }
        check_success(&response)?;
        decode::<serde_json::Value>(&response.body).map(|_| ())
    }

    fn collection_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    fn item_url(&self, id: TodoId) -> String {
        format!("{}/{id}/", self.base_url)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![(JSON_CONTENT_TYPE.0.to_string(), JSON_CONTENT_TYPE.1.to_string())]
}

fn encode<T: serde::Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Map non-2xx statuses to `ApiError::Service`.
fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::service(response.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    const TODO_BODY: &str = r#"{"id":1,"title":"New","description":"","status":"todo","created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z"}"#;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:8000/api/todos")
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/todos/");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
            description: String::new(),
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/todos/");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk", "description": ""}));
    }

    #[test]
    fn build_update_todo_omits_absent_fields() {
        let req = client()
            .build_update_todo(3, &UpdateTodo::status(Status::Completed))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/api/todos/3/");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"status": "completed"}));
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(42);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8000/api/todos/42/");
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:8000/api/todos//");
        assert_eq!(client.base_url(), "http://localhost:8000/api/todos");
        assert_eq!(client.build_list_todos().url, "http://localhost:8000/api/todos/");
    }

    #[test]
    fn parse_list_todos_success() {
        let body = format!("[{TODO_BODY}]");
        let todos = client().parse_list_todos(HttpResponse::new(200, body)).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "New");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_list_todos_server_error() {
        let err = client()
            .parse_list_todos(HttpResponse::new(500, "<html>boom</html>"))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Service {
                status: 500,
                message: "API Error: 500 Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn parse_create_todo_accepts_200_and_201() {
        for status in [200, 201] {
            let todo = client()
                .parse_create_todo(HttpResponse::new(status, TODO_BODY))
                .unwrap();
            assert_eq!(todo.id, 1);
        }
    }

    #[test]
    fn parse_accepts_any_2xx_with_json_body() {
        let todo = client()
            .parse_update_todo(HttpResponse::new(202, TODO_BODY))
            .unwrap();
        assert_eq!(todo.id, 1);

        let todos = client()
            .parse_list_todos(HttpResponse::new(203, format!("[{TODO_BODY}]")))
            .unwrap();
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn parse_redirect_status_is_service_error() {
        let err = client()
            .parse_list_todos(HttpResponse::new(302, ""))
            .unwrap_err();
        assert_eq!(err.status(), Some(302));
    }

    #[test]
    fn parse_create_todo_validation_rejection() {
        let err = client()
            .parse_create_todo(HttpResponse::new(400, r#"{"title":["This field may not be blank."]}"#))
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn parse_update_todo_not_found() {
        let err = client()
            .parse_update_todo(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_delete_todo_no_content() {
        assert!(client().parse_delete_todo(HttpResponse::new(204, "")).is_ok());
    }

    #[test]
    fn parse_delete_todo_other_success_parses_json() {
        assert!(client()
            .parse_delete_todo(HttpResponse::new(200, r#"{"deleted":true}"#))
            .is_ok());
        let err = client()
            .parse_delete_todo(HttpResponse::new(200, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let err = client()
            .parse_delete_todo(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
