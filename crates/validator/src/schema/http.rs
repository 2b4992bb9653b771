//! HTTP request validation over body, headers, params, query and cookies
//!
//! ```rust
//! use gatekeep_validator::schema::{HttpRequest, HttpSchema, HttpTarget, HttpValidator};
//! use gatekeep_validator::foundation::ValidationContext;
//! use gatekeep_validator::validators::required;
//! use http::Method;
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let schema = HttpSchema::builder()
//!     .add_field(HttpTarget::Body, "email", required())
//!     .for_methods([Method::POST])
//!     .build();
//! let validator = HttpValidator::new(schema);
//! let ctx = ValidationContext::new();
//!
//! let get = HttpRequest::new(Method::GET, "/users");
//! assert!(validator.validate(&get, &ctx).await.pass());
//!
//! let post = HttpRequest::new(Method::POST, "/users").body(json!({}));
//! let result = validator.validate(&post, &ctx).await;
//! assert_eq!(result.errors()[0].target.as_deref(), Some("body"));
//! # });
//! ```

use crate::foundation::SchemaError;
use crate::schema::target::{SchemaBuilder, Target, TargetRequest, TargetSchema};
use crate::schema::validate::TargetValidator;
use http::Method;
use http::header::{COOKIE, HeaderMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// The five HTTP targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpTarget {
    /// Parsed request body.
    Body,
    /// Request headers, keyed by lowercase name.
    Headers,
    /// Path parameters.
    Params,
    /// Query-string parameters.
    Query,
    /// Cookies.
    Cookies,
}

impl HttpTarget {
    const NAMES: [&'static str; 5] = ["body", "headers", "params", "query", "cookies"];
}

impl Target for HttpTarget {
    type Selector = Method;

    const ALL: &'static [Self] = &[
        Self::Body,
        Self::Headers,
        Self::Params,
        Self::Query,
        Self::Cookies,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Headers => "headers",
            Self::Params => "params",
            Self::Query => "query",
            Self::Cookies => "cookies",
        }
    }

    /// Header names are case-insensitive.
    fn lookup<'v>(&self, bag: &'v Value, field: &str) -> Option<&'v Value> {
        match self {
            Self::Headers => bag.get(field).or_else(|| {
                bag.as_object()?
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(field))
                    .map(|(_, value)| value)
            }),
            _ => bag.get(field),
        }
    }
}

impl fmt::Display for HttpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpTarget {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "body" => Ok(Self::Body),
            "headers" => Ok(Self::Headers),
            "params" => Ok(Self::Params),
            "query" => Ok(Self::Query),
            "cookies" => Ok(Self::Cookies),
            other => Err(SchemaError::UnknownTarget {
                target: other.to_string(),
                expected: Self::NAMES.to_vec(),
            }),
        }
    }
}

/// HTTP schema; the selector is the request method.
pub type HttpSchema = TargetSchema<HttpTarget>;

/// Builder of [`HttpSchema`].
pub type HttpSchemaBuilder = SchemaBuilder<HttpTarget>;

/// Validator of [`HttpRequest`]s.
pub type HttpValidator = TargetValidator<HttpTarget>;

impl SchemaBuilder<HttpTarget> {
    /// Restricts the schema to the given methods.
    #[must_use = "builder methods must be chained or built"]
    pub fn for_methods<I>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.applies_to(methods)
    }
}

// ============================================================================
// REQUEST
// ============================================================================

/// The parts of an HTTP request that get validated.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Request URL or path.
    pub url: String,
    /// Parsed body.
    pub body: Option<Value>,
    /// Headers.
    pub headers: Option<Value>,
    /// Path parameters.
    pub params: Option<Value>,
    /// Query parameters.
    pub query: Option<Value>,
    /// Cookies.
    pub cookies: Option<Value>,
}

impl HttpRequest {
    /// Creates a request with no value bags.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: None,
            params: None,
            query: None,
            cookies: None,
        }
    }

    /// Builds a request from `http` parts and an already-parsed body.
    ///
    /// Headers become an object keyed by lowercase name (repeated headers
    /// keep their last value; non-UTF-8 values are skipped). The query is
    /// form-urlencoded decoded (`%XX` escapes, `+` as space). Cookie values
    /// lose surrounding double quotes but are otherwise kept verbatim.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts, body: Value) -> Self {
        let mut request = Self::new(parts.method.clone(), parts.uri.to_string())
            .body(body)
            .headers(headers_to_value(&parts.headers))
            .cookies(cookies_to_value(&parts.headers));
        if let Some(query) = parts.uri.query() {
            request = request.query(query_to_value(query));
        }
        request
    }

    /// Sets the body.
    #[must_use = "builder methods must be chained or built"]
    pub fn body(mut self, values: Value) -> Self {
        self.body = Some(values);
        self
    }

    /// Sets the headers.
    #[must_use = "builder methods must be chained or built"]
    pub fn headers(mut self, values: Value) -> Self {
        self.headers = Some(values);
        self
    }

    /// Sets the path parameters.
    #[must_use = "builder methods must be chained or built"]
    pub fn params(mut self, values: Value) -> Self {
        self.params = Some(values);
        self
    }

    /// Sets the query parameters.
    #[must_use = "builder methods must be chained or built"]
    pub fn query(mut self, values: Value) -> Self {
        self.query = Some(values);
        self
    }

    /// Sets the cookies.
    #[must_use = "builder methods must be chained or built"]
    pub fn cookies(mut self, values: Value) -> Self {
        self.cookies = Some(values);
        self
    }
}

impl TargetRequest<HttpTarget> for HttpRequest {
    fn selector(&self) -> &Method {
        &self.method
    }

    fn values(&self, target: HttpTarget) -> Option<&Value> {
        match target {
            HttpTarget::Body => self.body.as_ref(),
            HttpTarget::Headers => self.headers.as_ref(),
            HttpTarget::Params => self.params.as_ref(),
            HttpTarget::Query => self.query.as_ref(),
            HttpTarget::Cookies => self.cookies.as_ref(),
        }
    }
}

fn headers_to_value(headers: &HeaderMap) -> Value {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((name.as_str().to_owned(), Value::String(value.to_owned())))
        })
        .collect::<Map<_, _>>()
        .into()
}

/// Later duplicates of a key win.
fn query_to_value(query: &str) -> Value {
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect::<Map<_, _>>()
        .into()
}

/// Cookies carry no standard encoding, so values are not percent-decoded.
fn cookies_to_value(headers: &HeaderMap) -> Value {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((key.trim().to_owned(), Value::String(value.to_owned())))
        })
        .collect::<Map<_, _>>()
        .into()
}
