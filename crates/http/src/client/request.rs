//! Replayable request descriptors
//!
//! A `reqwest::RequestBuilder` is consumed by `send` and multipart bodies
//! cannot be cloned, so requests are described here and rebuilt for every
//! attempt.

use gallery_core::validation::ImageFile;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use super::ClientError;

/// One part of a multipart body
#[derive(Debug, Clone)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: ImageFile },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(name: impl Into<String>, file: ImageFile) -> Self {
        Self::File {
            name: name.into(),
            file,
        }
    }
}

/// Request body
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// Method, path and body of one logical API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: RequestBody,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a multipart body
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Whether this request has already been resent after a 401
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }
}

impl RequestBody {
    /// Apply the body to a fresh request builder
    pub(crate) fn apply(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        match self {
            Self::Empty => Ok(builder),
            Self::Json(value) => Ok(builder.json(value)),
            Self::Multipart(parts) => Ok(builder.multipart(build_form(parts)?)),
        }
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File { name, file } => {
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let mut request = ApiRequest::post("/change-order")
            .json(&serde_json::json!({"imageOrder": []}))
            .unwrap();
        assert_eq!(*request.method(), Method::POST);
        assert_eq!(request.path(), "/change-order");
        assert!(matches!(request.body(), RequestBody::Json(_)));

        assert!(!request.is_retried());
        request.mark_retried();
        assert!(request.is_retried());
    }

    #[test]
    fn test_multipart_parts_survive_cloning() {
        let request = ApiRequest::post("/upload").multipart(vec![
            FormPart::file("images", ImageFile::new("a.png", vec![1, 2])),
            FormPart::text("titles", r#"["A"]"#),
        ]);
        let copy = request.clone();
        match copy.body() {
            RequestBody::Multipart(parts) => assert_eq!(parts.len(), 2),
            other => panic!("unexpected body {other:?}"),
        }
        assert!(build_form(&[FormPart::text("title", "x")]).is_ok());
    }
}
