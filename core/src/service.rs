//! Remote todo service: `TodoClient` request shapes executed over a `Transport`.

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// One HTTP round trip per operation against a fixed base resource.
#[derive(Debug, Clone)]
pub struct TodoService<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoService<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_list_todos();
        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_list_todos(response));
        log_failure("list todos", result)
    }

    pub async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let result = match self.client.build_create_todo(input) {
            Ok(request) => self
                .send(request)
                .await
                .and_then(|response| self.client.parse_create_todo(response)),
            Err(e) => Err(e),
        };
        log_failure("create todo", result)
    }

    pub async fn update(&self, id: TodoId, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let result = match self.client.build_update_todo(id, input) {
            Ok(request) => self
                .send(request)
                .await
                .and_then(|response| self.client.parse_update_todo(response)),
            Err(e) => Err(e),
        };
        log_failure("update todo", result)
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id);
        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_delete_todo(response));
        log_failure("delete todo", result)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn log_failure<R>(operation: &str, result: Result<R, ApiError>) -> Result<R, ApiError> {
    if let Err(e) = &result {
        warn!(error = %e, "failed to {operation}");
    }
    result
}
