//! Form validation
//!
//! Forms double as request bodies: a form that passes [`validate`] is
//! serialized with its text fields trimmed, matching what was checked. Fields that only exist for the user (password
//! confirmation, file contents) are skipped during serialization.
//!
//! [`validate`]: SignupForm::validate

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Largest accepted image upload
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Longest accepted image title
pub const MAX_TITLE_CHARS: usize = 100;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z ]*$").expect("valid name regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));
static CACHE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("valid code regex"));

/// Field name to message, one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field is kept
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Message for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

/// Common validation helpers
pub mod validators {
    use super::{CACHE_CODE_RE, EMAIL_RE, FieldErrors, NAME_RE, PHONE_RE};

    /// Validate that a string is not blank
    pub fn validate_not_empty(errors: &mut FieldErrors, value: &str, field: &str) -> bool {
        if value.trim().is_empty() {
            errors.add(field, "This field is required");
            return false;
        }
        true
    }

    /// Validate email format (basic check)
    pub fn validate_email(errors: &mut FieldErrors, email: &str, field: &str) {
        if validate_not_empty(errors, email, field) && !EMAIL_RE.is_match(email.trim()) {
            errors.add(field, "Invalid email address");
        }
    }

    /// Validate a display name: letters and spaces, 3 to 50 characters
    pub fn validate_name(errors: &mut FieldErrors, name: &str, field: &str) {
        if !validate_not_empty(errors, name, field) {
            return;
        }
        let name = name.trim();
        let len = name.chars().count();
        if !(3..=50).contains(&len) {
            errors.add(field, "Name must be between 3 and 50 characters");
        } else if !NAME_RE.is_match(name) {
            errors.add(field, "Name may only contain letters and spaces");
        }
    }

    /// Validate a 10 digit phone number
    pub fn validate_phone(errors: &mut FieldErrors, phone: &str, field: &str) {
        if validate_not_empty(errors, phone, field) && !PHONE_RE.is_match(phone.trim()) {
            errors.add(field, "Phone number must be exactly 10 digits");
        }
    }

    /// Validate password strength
    pub fn validate_password(errors: &mut FieldErrors, password: &str, field: &str) {
        if password.is_empty() {
            errors.add(field, "This field is required");
        } else if password.chars().count() < 8 {
            errors.add(field, "Password must be at least 8 characters");
        } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.add(field, "Password must contain an uppercase letter");
        } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.add(field, "Password must contain a lowercase letter");
        } else if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.add(field, "Password must contain a number");
        } else if password.chars().all(char::is_alphanumeric) {
            errors.add(field, "Password must contain a special character");
        }
    }

    /// Validate that the confirmation matches
    pub fn validate_confirmation(
        errors: &mut FieldErrors,
        password: &str,
        confirmation: &str,
        field: &str,
    ) {
        if confirmation.is_empty() {
            errors.add(field, "This field is required");
        } else if password != confirmation {
            errors.add(field, "Passwords do not match");
        }
    }

    /// Validate a 6 digit verification code
    pub fn validate_cache_code(errors: &mut FieldErrors, code: &str, field: &str) {
        if validate_not_empty(errors, code, field) && !CACHE_CODE_RE.is_match(code.trim()) {
            errors.add(field, "Verification code must be 6 digits");
        }
    }

    /// Validate an image title
    pub fn validate_title(errors: &mut FieldErrors, title: &str, field: &str) {
        if validate_not_empty(errors, title, field)
            && title.trim().chars().count() > super::MAX_TITLE_CHARS
        {
            errors.add(
                field,
                format!("Title must be at most {} characters", super::MAX_TITLE_CHARS),
            );
        }
    }
}

use validators::{
    validate_cache_code, validate_confirmation, validate_email, validate_name, validate_password,
    validate_phone, validate_title,
};

/// Send what was validated: text fields go out without surrounding whitespace
fn trimmed<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.trim())
}

/// Registration form
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[serde(serialize_with = "trimmed")]
    pub name: String,
    #[serde(serialize_with = "trimmed")]
    pub email: String,
    #[serde(serialize_with = "trimmed")]
    pub phone: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_name(&mut errors, &self.name, "name");
        validate_email(&mut errors, &self.email, "email");
        validate_phone(&mut errors, &self.phone, "phone");
        validate_password(&mut errors, &self.password, "password");
        validate_confirmation(
            &mut errors,
            &self.password,
            &self.confirm_password,
            "confirmPassword",
        );
        errors.into_result()
    }
}

/// Sign-in form
#[derive(Debug, Clone, Default, Serialize)]
pub struct SigninForm {
    #[serde(serialize_with = "trimmed")]
    pub email: String,
    pub password: String,
}

impl SigninForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_email(&mut errors, &self.email, "email");
        if self.password.is_empty() {
            errors.add("password", "This field is required");
        }
        errors.into_result()
    }
}

/// Email verification form
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyForm {
    #[serde(serialize_with = "trimmed")]
    pub email: String,
    #[serde(serialize_with = "trimmed")]
    pub cache_code: String,
}

impl VerifyForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_email(&mut errors, &self.email, "email");
        validate_cache_code(&mut errors, &self.cache_code, "cacheCode");
        errors.into_result()
    }
}

/// Password reset request form
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForgotPasswordForm {
    #[serde(serialize_with = "trimmed")]
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_email(&mut errors, &self.email, "email");
        errors.into_result()
    }
}

/// New password form, completed with the emailed code
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[serde(serialize_with = "trimmed")]
    pub cache_code: String,
    pub password: String,
    #[serde(serialize_with = "trimmed")]
    pub email: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_email(&mut errors, &self.email, "email");
        validate_cache_code(&mut errors, &self.cache_code, "cacheCode");
        validate_password(&mut errors, &self.password, "password");
        validate_confirmation(
            &mut errors,
            &self.password,
            &self.confirm_password,
            "confirmPassword",
        );
        errors.into_result()
    }
}

/// Image file picked for upload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Build a file, inferring the content type from the extension
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn is_supported_type(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    fn validate(&self, errors: &mut FieldErrors, field: &str) {
        if self.bytes.is_empty() {
            errors.add(field, format!("{} is empty", self.file_name));
        } else if !self.is_supported_type() {
            errors.add(
                field,
                format!("{} is not a supported image type", self.file_name),
            );
        } else if self.bytes.len() > MAX_IMAGE_BYTES {
            errors.add(field, format!("{} is larger than 5 MB", self.file_name));
        }
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// MIME type for the supported image extensions
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// New images with one title each
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub files: Vec<ImageFile>,
    pub titles: Vec<String>,
}

impl UploadForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.files.is_empty() {
            errors.add("images", "Select at least one image");
        }
        if self.titles.len() != self.files.len() {
            errors.add("titles", "Each image needs a title");
        }
        for (i, title) in self.titles.iter().enumerate() {
            validate_title(&mut errors, title, &format!("titles[{i}]"));
        }
        for (i, file) in self.files.iter().enumerate() {
            file.validate(&mut errors, &format!("images[{i}]"));
        }
        errors.into_result()
    }
}

/// Edit of an existing image
#[derive(Debug, Clone, Default)]
pub struct UpdateForm {
    pub title: String,
    pub file: Option<ImageFile>,
}

impl UpdateForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_title(&mut errors, &self.title, "title");
        if let Some(file) = &self.file {
            file.validate(&mut errors, "image");
        }
        errors.into_result()
    }
}
