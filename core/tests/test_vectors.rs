//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either an expected parse result or an expected service error.
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use todo_core::{ApiError, CreateTodo, HttpMethod, HttpRequest, HttpResponse, Todo, TodoClient, UpdateTodo};

const BASE_URL: &str = "http://localhost:8000/api/todos";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Compare a parse result with `expected_result` or `expected_error`.
fn check_outcome<T, F>(name: &str, case: &serde_json::Value, result: Result<T, ApiError>, check_ok: F)
where
    F: FnOnce(T, &serde_json::Value),
{
    match case.get("expected_error") {
        Some(expected) => {
            let err = result.err().unwrap_or_else(|| panic!("{name}: expected an error"));
            let status = expected["status"].as_u64().unwrap() as u16;
            let message = expected["message"].as_str().unwrap().to_string();
            assert_eq!(err, ApiError::Service { status, message }, "{name}: error");
        }
        None => {
            let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            check_ok(value, &case["expected_result"]);
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();

        check_request(name, &c.build_list_todos(), &case["expected_request"]);

        let result = c.parse_list_todos(simulated(&case));
        check_outcome(name, &case, result, |todos, expected| {
            let expected: Vec<Todo> = serde_json::from_value(expected.clone()).unwrap();
            assert_eq!(todos, expected, "{name}: parsed result");
        });
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CreateTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_todo(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_todo(simulated(&case));
        check_outcome(name, &case, result, |todo, expected| {
            let expected: Todo = serde_json::from_value(expected.clone()).unwrap();
            assert_eq!(todo, expected, "{name}: parsed result");
        });
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let input: UpdateTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_todo(id, &input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_update_todo(simulated(&case));
        check_outcome(name, &case, result, |todo, expected| {
            let expected: Todo = serde_json::from_value(expected.clone()).unwrap();
            assert_eq!(todo, expected, "{name}: parsed result");
        });
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        check_request(name, &c.build_delete_todo(id), &case["expected_request"]);

        let result = c.parse_delete_todo(simulated(&case));
        check_outcome(name, &case, result, |(), _| {});
    }
}
