//! Response classification and payload decoding
//!
//! Every API response goes through [`classify`]: a 2xx status yields a
//! [`Payload`], anything else becomes a typed error. Payloads are then
//! decoded either as plain JSON or as Java-object JSON, where every object is
//! preceded by its class name (`["com.acme.Foo", {...}]`) and the class tags
//! must be stripped first.

use std::borrow::Cow;
use std::sync::Arc;

use airvantage_domain::constants::{JAVA_OBJECT_NAMESPACE_SIERRA, MASKED_PARAMS};
use airvantage_domain::{AirVantageError, DomainError, Result};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::ports::{ResponseObserver, TracingObserver};
use crate::url_builder::mask_url_params;

static SIERRA_CLASS_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(JAVA_OBJECT_NAMESPACE_SIERRA)
        .expect("SIERRA_CLASS_TAGS should compile - this is a bug")
});

/// Body of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Body(Vec<u8>),
    /// No body, or an error status whose body carried no error code.
    Empty,
}

impl Payload {
    fn from_body(body: Vec<u8>) -> Self {
        if body.is_empty() {
            Self::Empty
        } else {
            Self::Body(body)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Raw body as text, for endpoints that return opaque documents.
    pub fn into_text(self) -> String {
        match self {
            Self::Body(body) => String::from_utf8_lossy(&body).into_owned(),
            Self::Empty => String::new(),
        }
    }

    /// Decode standard JSON into `T`
    ///
    /// An empty payload is decoded from JSON `null`, so only targets that
    /// accept `null` (`()`, `Option<_>`) succeed on it.
    ///
    /// # Errors
    /// Returns `AirVantageError::Decode` when the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Body(body) => serde_json::from_slice(body).map_err(AirVantageError::Decode),
            Self::Empty => serde_json::from_value(Value::Null).map_err(AirVantageError::Decode),
        }
    }

    /// Decode Java-object JSON into `T` after stripping class tags
    ///
    /// # Errors
    /// Returns `AirVantageError::Decode` when the filtered body is not UTF-8
    /// JSON matching `T`.
    pub fn decode_java<T: DeserializeOwned>(&self, filter: &JavaObjectFilter) -> Result<T> {
        match self {
            Self::Body(body) => serde_json::from_slice(&filter.strip(body)).map_err(AirVantageError::Decode),
            Self::Empty => self.decode(),
        }
    }
}

/// Strips Java class tags matched by a pattern
///
/// The pattern must match the quoted class name *and* the comma that
/// follows it, e.g. `"com\.acme\.[A-Za-z.]+",`. Escaping is up to the
/// caller.
#[derive(Debug, Clone)]
pub struct JavaObjectFilter {
    pattern: Regex,
}

impl JavaObjectFilter {
    /// # Errors
    /// Returns `AirVantageError::InvalidArgument` for an empty or invalid
    /// pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(AirVantageError::InvalidArgument("class tag pattern is empty".to_string()));
        }
        let pattern = Regex::new(pattern).map_err(|e| {
            AirVantageError::InvalidArgument(format!("invalid class tag pattern: {e}"))
        })?;
        Ok(Self { pattern })
    }

    /// Filter for the `com.sierrawireless.*` namespace
    pub fn sierra() -> Self {
        Self { pattern: SIERRA_CLASS_TAGS.clone() }
    }

    pub fn strip<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]> {
        self.pattern.replace_all(body, &b""[..])
    }
}

/// Error body sent with non-2xx statuses
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(alias = "Error", default)]
    error: Option<String>,
    #[serde(rename = "errorParameters", alias = "ErrorParameters", default)]
    error_parameters: Option<Vec<String>>,
}

/// Classify a fully buffered response
///
/// - 2xx: success, the body becomes the payload
/// - empty body: `Transport` error with status and reason
/// - body that is not an error document: `MalformedErrorBody`
/// - error document without a code, or JSON `null`: success with an empty
///   payload
/// - otherwise: `Domain` error carrying `path`
///
/// # Errors
/// See above.
pub fn classify(path: &str, status: u16, reason: &str, body: Vec<u8>) -> Result<Payload> {
    if (200..=299).contains(&status) {
        return Ok(Payload::from_body(body));
    }

    if body.is_empty() {
        return Err(AirVantageError::Transport { status, reason: reason.to_string() });
    }

    let api_error: Option<ApiErrorBody> =
        serde_json::from_slice(&body).map_err(AirVantageError::MalformedErrorBody)?;
    let Some(api_error) = api_error else {
        return Ok(Payload::Empty);
    };

    match api_error.error.filter(|code| !code.is_empty()) {
        Some(code) => Err(DomainError::new(
            path,
            code,
            api_error.error_parameters.unwrap_or_default(),
        )
        .into()),
        None => Ok(Payload::Empty),
    }
}

/// Classifier bound to an observer and a debug switch
///
/// With debug on, the masked URL and the raw body reach the observer before
/// anything is parsed.
#[derive(Clone)]
pub struct ResponseClassifier {
    observer: Arc<dyn ResponseObserver>,
    debug: bool,
}

impl std::fmt::Debug for ResponseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseClassifier").field("debug", &self.debug).finish_non_exhaustive()
    }
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self { observer: Arc::new(TracingObserver), debug: false }
    }
}

impl ResponseClassifier {
    pub fn new(observer: Arc<dyn ResponseObserver>, debug: bool) -> Self {
        Self { observer, debug }
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_observer(&mut self, observer: Arc<dyn ResponseObserver>) {
        self.observer = observer;
    }

    /// Observe (when debugging) then [`classify`] a response to `url`
    ///
    /// # Errors
    /// See [`classify`].
    pub fn classify(&self, url: &Url, status: u16, reason: &str, body: Vec<u8>) -> Result<Payload> {
        if self.debug {
            let masked = mask_url_params(url.as_str(), MASKED_PARAMS);
            self.observer.on_response(&masked, status, &body);
        }
        classify(url.path(), status, reason, body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde::Deserialize;

    use super::*;

    #[derive(Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<(String, u16, String)>>,
    }

    impl ResponseObserver for RecordingObserver {
        fn on_response(&self, url: &str, status: u16, body: &[u8]) {
            self.seen.lock().unwrap().push((
                url.to_string(),
                status,
                String::from_utf8_lossy(body).into_owned(),
            ));
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Foo {
        a: i32,
    }

    #[test]
    fn success_keeps_body() {
        let payload = classify("/p", 200, "OK", br#"{"a":1}"#.to_vec()).unwrap();
        assert_eq!(payload.decode::<Foo>().unwrap(), Foo { a: 1 });
    }

    #[test]
    fn empty_success_is_empty_payload() {
        let payload = classify("/p", 204, "No Content", Vec::new()).unwrap();
        assert!(payload.is_empty());
        payload.decode::<()>().unwrap();
        assert_eq!(payload.decode::<Option<Foo>>().unwrap(), None);
        assert!(matches!(payload.decode::<Foo>(), Err(AirVantageError::Decode(_))));
    }

    #[test]
    fn structured_error_becomes_domain_error() {
        let body = br#"{"Error":"x","ErrorParameters":["a","b"]}"#.to_vec();
        let err = classify("/api/v1/systems", 400, "Bad Request", body).unwrap_err();

        assert_eq!(err.to_string(), "/api/v1/systems  x: a, b");
        assert_eq!(err.api_code(), Some("x"));
    }

    #[test]
    fn lower_case_error_keys_and_null_parameters() {
        let body = br#"{"error":"system.not.found","errorParameters":null}"#.to_vec();
        let err = classify("/p", 404, "Not Found", body).unwrap_err();

        match err {
            AirVantageError::Domain(domain) => {
                assert_eq!(domain.code, "system.not.found");
                assert!(domain.parameters.is_empty());
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn empty_error_body_is_transport_error() {
        let err = classify("/p", 503, "Service Unavailable", Vec::new()).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn garbage_error_body_is_malformed() {
        let err = classify("/p", 500, "Internal Server Error", b"<html>oops</html>".to_vec())
            .unwrap_err();
        assert!(matches!(err, AirVantageError::MalformedErrorBody(_)));
    }

    #[test]
    fn error_document_without_code_is_empty_success() {
        let payload = classify("/p", 400, "Bad Request", br#"{"Error":""}"#.to_vec()).unwrap();
        assert!(payload.is_empty());
        assert!(matches!(payload.decode::<Foo>(), Err(AirVantageError::Decode(_))));
    }

    #[test]
    fn null_error_document_is_empty_success() {
        let payload = classify("/p", 500, "Internal Server Error", b"null".to_vec()).unwrap();
        assert!(payload.is_empty());
        payload.decode::<()>().unwrap();
    }

    #[test]
    fn redirect_status_is_not_success() {
        let err = classify("/p", 302, "Found", Vec::new()).unwrap_err();
        assert_eq!(err.status(), Some(302));
    }

    #[test]
    fn success_body_mismatch_is_decode_error() {
        let payload = classify("/p", 200, "OK", br#"{"a":"one"}"#.to_vec()).unwrap();
        assert!(matches!(payload.decode::<Foo>(), Err(AirVantageError::Decode(_))));
    }

    #[test]
    fn java_decode_strips_class_tags() {
        let filter = JavaObjectFilter::new(r#""com\.example\.[A-Za-z]+","#).unwrap();
        let payload = Payload::Body(br#"["com.example.Foo",{"a":1}]"#.to_vec());

        let decoded: Vec<Foo> = payload.decode_java(&filter).unwrap();
        assert_eq!(decoded, vec![Foo { a: 1 }]);
    }

    #[test]
    fn java_decode_handles_nested_pairs() {
        #[derive(Debug, Deserialize)]
        struct Outer {
            inner: Vec<Foo>,
        }

        let filter = JavaObjectFilter::new(r#""com\.example\.[A-Za-z]+","#).unwrap();
        let body = r#"["com.example.Outer", {"inner": ["com.example.Foo", {"a": 7}]}]"#;
        let decoded: Vec<Outer> = Payload::Body(body.as_bytes().to_vec()).decode_java(&filter).unwrap();

        assert_eq!(decoded[0].inner, vec![Foo { a: 7 }]);
    }

    #[test]
    fn java_decode_failure_is_decode_error() {
        let filter = JavaObjectFilter::new(r#""org\.other\.[A-Za-z]+","#).unwrap();
        let payload = Payload::Body(br#"["com.example.Foo",{"a":1}]"#.to_vec());

        assert!(matches!(payload.decode_java::<Vec<Foo>>(&filter), Err(AirVantageError::Decode(_))));
    }

    #[test]
    fn sierra_filter_matches_namespace() {
        let filter = JavaObjectFilter::sierra();
        let body = r#"["com.sierrawireless.airvantage.services.communication.dto.SystemSecurityInfo",
            {"systemExist": true}]"#;
        let stripped = filter.strip(body.as_bytes());

        assert!(!String::from_utf8_lossy(&stripped).contains("sierrawireless"));
        let value: Value = serde_json::from_slice(&stripped).unwrap();
        assert_eq!(value[0]["systemExist"], Value::Bool(true));
    }

    #[test]
    fn java_decode_rejects_invalid_utf8() {
        let filter = JavaObjectFilter::new(r#""com\.example\.[A-Za-z]+","#).unwrap();
        let body = b"[\"com.example.Foo\",{\"a\":1,\"b\":\"\xff\"}]".to_vec();

        let payload = Payload::Body(body);
        assert!(matches!(payload.decode::<Value>(), Err(AirVantageError::Decode(_))));
        assert!(matches!(payload.decode_java::<Value>(&filter), Err(AirVantageError::Decode(_))));
    }

    #[test]
    fn invalid_filter_pattern_is_rejected() {
        assert!(matches!(JavaObjectFilter::new(""), Err(AirVantageError::InvalidArgument(_))));
        assert!(matches!(JavaObjectFilter::new("(unclosed"), Err(AirVantageError::InvalidArgument(_))));
    }

    #[test]
    fn observer_sees_masked_url_and_raw_body_only_in_debug() {
        let observer = Arc::new(RecordingObserver::default());
        let url = Url::parse("https://h/device/internal/securityinfo?id=1&AUTHKEY=secret").unwrap();

        let quiet = ResponseClassifier::new(observer.clone(), false);
        quiet.classify(&url, 200, "OK", b"[]".to_vec()).unwrap();
        assert!(observer.seen.lock().unwrap().is_empty());

        let loud = ResponseClassifier::new(observer.clone(), true);
        let err = loud.classify(&url, 500, "Internal Server Error", b"not json".to_vec()).unwrap_err();
        assert!(matches!(err, AirVantageError::MalformedErrorBody(_)));

        let seen = observer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "https://h/device/internal/securityinfo?id=1&AUTHKEY=***");
        assert_eq!(seen[0].1, 500);
        assert_eq!(seen[0].2, "not json");
    }

    #[test]
    fn domain_error_path_comes_from_url() {
        let url = Url::parse("https://h/api/v1/systems/abc?company=T").unwrap();
        let err = ResponseClassifier::default()
            .classify(&url, 404, "Not Found", br#"{"Error":"system.not.found","ErrorParameters":["abc"]}"#.to_vec())
            .unwrap_err();

        assert_eq!(err.to_string(), "/api/v1/systems/abc  system.not.found: abc");
    }
}
