use clubdesk_core::ClientError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
pub use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Body of an outgoing request.
///
/// Bodies are kept as owned data so a request can be sent twice.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// A JSON document.
    Json(Value),
    /// A `multipart/form-data` form.
    Multipart(MultipartBody),
}

/// A file attached to a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, if known.
    pub mime: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Description of a multipart form, rebuilt for every send.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartBody {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((name.into(), value.to_string()));
        self
    }

    /// Add a file.
    pub fn file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    /// Text fields in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Attached files.
    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub(crate) fn to_form(&self) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime).map_err(|e| {
                    ClientError::Validation(format!("Invalid MIME type '{}': {}", mime, e))
                })?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

/// Method, query, headers and body of a request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Extra headers. They override the default `Content-Type`.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    /// Options for `method` with no query, headers or body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// A `GET`.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// A `POST`.
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// A `PUT`.
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    /// A `DELETE`.
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Serialize `body` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Validation(format!("Body serialization error: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Use a multipart form as the body.
    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when `value` is set and not blank.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()) {
            Some(v) if !v.trim().is_empty() => self.query(key, v),
            _ => self,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Headers for one send: the JSON content type, then caller headers, then
    /// the bearer token if one is given.
    pub(crate) fn header_map(&self, token: Option<&str>) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        if !matches!(self.body, RequestBody::Multipart(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::Validation(format!("Invalid header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Validation(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::Store("Stored access token is not a valid header".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_type_and_bearer() {
        let headers = RequestOptions::get().header_map(Some("A1")).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer A1");
    }

    #[test]
    fn no_token_no_authorization() {
        let headers = RequestOptions::get().header_map(None).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn caller_headers_override_content_type() {
        let headers = RequestOptions::post()
            .header("Content-Type", "text/plain")
            .header("X-Club", "1")
            .header_map(None)
            .unwrap();
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers["x-club"], "1");
    }

    #[test]
    fn multipart_leaves_content_type_to_the_form() {
        let headers = RequestOptions::post()
            .multipart(MultipartBody::new().text("code_act", "YOGA"))
            .header_map(Some("A1"))
            .unwrap();
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn blank_optional_query_is_skipped() {
        let options = RequestOptions::get()
            .query_opt("search", Some("dup"))
            .query_opt("sort", Some(""))
            .query_opt::<u32>("id", None);
        assert_eq!(options.query, vec![("search".to_string(), "dup".to_string())]);
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let err = RequestOptions::get()
            .header("bad header", "x")
            .header_map(None)
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
