//! Basic usage example for gatekeep-validator

use gatekeep_validator::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let validations: EntityValidations = serde_json::from_value(json!({
        "conditions": {"isPublished": false},
        "inputRules": {
            "title": [
                {"operations": ["*"], "required": true, "minLength": 3},
                {"operations": [["update", ["isPublished"]]], "maxLength": 60}
            ],
            "status": [{"operations": ["create", "update"], "oneOf": ["draft", "live"]}]
        }
    }))
    .expect("valid declarations");

    let schema = EntitySchema::for_operation("update", &validations).expect("valid rule options");
    let validator = EntityValidator::new(schema);

    let request = EntityRequest::new("update").input(json!({"title": "Hi", "status": "gone"}));

    for published in [false, true] {
        let ctx = ValidationContext::builder()
            .condition("isPublished", published)
            .build();
        let result = validator.validate(&request, &ctx).await;
        println!("isPublished = {published}: {result}");
        for error in result.errors() {
            println!("  {}", serde_json::to_string(error).expect("errors serialize"));
        }
    }
}
