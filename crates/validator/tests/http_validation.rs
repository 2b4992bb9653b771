//! Integration tests for HTTP request validation.

use gatekeep_validator::prelude::*;
use http::Method;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn signup_schema() -> HttpSchema {
    HttpSchema::builder()
        .add_field(HttpTarget::Body, "email", compose![required(), datatype(DataType::String)])
        .add_field(HttpTarget::Body, "age", compose![integer(), in_range(13.0, 130.0).unwrap()])
        .add_field(HttpTarget::Headers, "content-type", one_of([json!("application/json")]))
        .add_field(HttpTarget::Query, "ref", max_length(16))
        .add_field(HttpTarget::Cookies, "session", required())
        .for_methods([Method::POST, Method::PUT])
        .build()
}

fn signup_request(method: Method, uri: &str, body: serde_json::Value) -> HttpRequest {
    let (parts, ()) = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Cookie", "session=abc123; theme=dark")
        .body(())
        .unwrap()
        .into_parts();
    HttpRequest::from_parts(&parts, body)
}

#[tokio::test]
async fn get_request_skips_post_schema() {
    let validator = HttpValidator::new(signup_schema());
    let request = HttpRequest::new(Method::GET, "/signup");
    assert!(validator.validate(&request, &ValidationContext::new()).await.pass());
}

#[rstest]
#[case::post(Method::POST)]
#[case::put(Method::PUT)]
#[tokio::test]
async fn valid_signup_passes(#[case] method: Method) {
    let validator = HttpValidator::new(signup_schema());
    let request = signup_request(method, "/signup?ref=newsletter", json!({"email": "a@b.c", "age": 30}));
    let result = validator.validate(&request, &ValidationContext::new()).await;
    assert!(result.pass(), "{result}");
}

#[tokio::test]
async fn errors_name_their_target() {
    let validator = HttpValidator::new(signup_schema());
    let request = signup_request(
        Method::POST,
        "/signup?ref=a-very-long-campaign-name",
        json!({"age": 12.5}),
    );

    let result = validator.validate(&request, &ValidationContext::new()).await;
    let found: Vec<_> = result
        .errors()
        .iter()
        .map(|e| (e.target.clone().unwrap_or_default(), e.dotted_path()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("body".to_string(), "body.email".to_string()),
            ("body".to_string(), "body.age".to_string()),
            ("body".to_string(), "body.age".to_string()),
            ("query".to_string(), "query.ref".to_string()),
        ]
    );
}

#[tokio::test]
async fn missing_cookie_fails() {
    let validator = HttpValidator::new(signup_schema()).with_options(ValidationOptions::fail_fast());
    let request = HttpRequest::new(Method::POST, "/signup")
        .body(json!({"email": "a@b.c"}))
        .headers(json!({"content-type": "application/json"}));

    let result = validator.validate(&request, &ValidationContext::new()).await;
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].dotted_path(), "cookies.session");
    assert_eq!(result.errors()[0].message_ids, vec!["validation.required"]);
}

#[tokio::test]
async fn params_are_validated() {
    let schema = HttpSchema::builder()
        .add_field(HttpTarget::Params, "id", pattern("^[0-9]+$").unwrap())
        .build();
    let validator = HttpValidator::new(schema);
    let request = HttpRequest::new(Method::DELETE, "/users/x1").params(json!({"id": "x1"}));

    let result = validator.validate(&request, &ValidationContext::new()).await;
    assert_eq!(result.errors()[0].path, ["params", "id"]);
    assert_eq!(result.errors()[0].target.as_deref(), Some("params"));
}

#[tokio::test]
async fn query_values_are_decoded_before_validation() {
    let schema = HttpSchema::builder()
        .add_field(HttpTarget::Query, "q", max_length(4))
        .add_field(HttpTarget::Query, "name", one_of([json!("John Doe")]))
        .build();
    let validator = HttpValidator::new(schema);
    let request = signup_request(Method::GET, "/search?q=caf%C3%A9&name=John+Doe", json!(null));

    let result = validator.validate(&request, &ValidationContext::new()).await;
    assert!(result.pass(), "{result}");
    assert_eq!(request.query, Some(json!({"q": "café", "name": "John Doe"})));
}

#[rstest]
#[case::canonical("Content-Type")]
#[case::lowercase("content-type")]
#[case::shouting("CONTENT-TYPE")]
#[tokio::test]
async fn header_fields_ignore_case(#[case] field: &str) {
    let schema = HttpSchema::builder()
        .add_field(HttpTarget::Headers, field, required())
        .build();
    let validator = HttpValidator::new(schema);
    let request = signup_request(Method::POST, "/signup", json!({}));

    let result = validator.validate(&request, &ValidationContext::new()).await;
    assert!(result.pass(), "{result}");
}

#[test]
fn unknown_target_name() {
    let err = "session".parse::<HttpTarget>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown target 'session', expected one of: body, headers, params, query, cookies"
    );
}
