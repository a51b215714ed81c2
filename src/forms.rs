//! Submitted form handling: a body extractor that accepts both urlencoded and
//! multipart posts, field error collection, and the value parsers shared by
//! the typed forms in `dto`.

use std::collections::{BTreeMap, HashMap};

use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use serde::{Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::error::{AppError, AppResult};

/// Per-field error messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Starts from the outcome of a `validator` pass.
    pub fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        match result {
            Ok(()) => Self::default(),
            Err(errors) => errors.into(),
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, list) in errors.field_errors() {
            for error in list {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", error.code));
                out.add(&field, message);
            }
        }
        out
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Raw body of a dashboard post: text fields plus any attached files.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl FormData {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, field: &str, file: UploadedFile) -> Self {
        self.files.push((field.to_string(), file));
        self
    }

    /// True when the field was submitted at all, even empty (submit buttons).
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Removes and returns every file posted under `name`.
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        taken.into_iter().map(|(_, file)| file).collect()
    }

    /// Binds the text fields onto a typed form. Forms default missing fields,
    /// so this only fails on a malformed body.
    pub fn bind<T: DeserializeOwned>(&self) -> AppResult<T> {
        let value = serde_json::to_value(&self.fields)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            return Ok(Self::from_pairs(pairs));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;

        let mut data = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(|err| {
            tracing::warn!(error = %err, "could not read multipart field");
            AppError::BadRequest("could not read multipart body".into())
        })? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(|err| {
                tracing::warn!(error = %err, "could not read multipart bytes");
                AppError::BadRequest("could not read multipart body".into())
            })?;

            match file_name {
                // Browsers send an empty part when no file was picked.
                Some(file_name) if file_name.is_empty() && bytes.is_empty() => {}
                Some(file_name) => data.files.push((
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    },
                )),
                None => {
                    let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
                        AppError::BadRequest(format!("field {name} is not valid UTF-8"))
                    })?;
                    data.fields.insert(name, text);
                }
            }
        }
        Ok(data)
    }
}

/// Strips surrounding whitespace in place, so validation sees what is stored.
pub fn trim_field(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Object ids arrive as form text. Anything that is not a known id is
/// reported as missing rather than malformed.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound)
}

/// Parses a decimal amount with at most two fractional digits into minor
/// units. Amounts must fit eight significant digits (999999.99).
pub fn parse_price(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    let total = whole.checked_mul(100)?.checked_add(cents)?;
    (total <= 99_999_999).then_some(total)
}

/// Non-negative whole number that fits the integer columns.
pub fn parse_count(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|n| *n >= 0)
}

/// Checks uploaded files before anything is written to storage.
pub fn check_images(field: &str, files: &[UploadedFile]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for file in files.iter().filter(|file| !file.is_image()) {
        errors.add(
            field,
            format!("{}: upload a valid image.", file.file_name),
        );
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Combines a cleaned form with the image check so both report together.
pub fn with_images<T>(
    cleaned: Result<T, FieldErrors>,
    files: &[UploadedFile],
) -> Result<T, FieldErrors> {
    match (cleaned, check_images("images", files)) {
        (Ok(input), Ok(())) => Ok(input),
        (Err(mut errors), Err(images)) => {
            errors.merge(images);
            Err(errors)
        }
        (Err(errors), Ok(())) | (Ok(_), Err(errors)) => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn parses_prices_into_cents() {
        assert_eq!(parse_price("12"), Some(1200));
        assert_eq!(parse_price("12.5"), Some(1250));
        assert_eq!(parse_price(" 0.99 "), Some(99));
        assert_eq!(parse_price(".5"), Some(50));
        assert_eq!(parse_price("999999.99"), Some(99_999_999));
    }

    #[test]
    fn rejects_bad_prices() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("."), None);
        assert_eq!(parse_price("-3"), None);
        assert_eq!(parse_price("1.234"), None);
        assert_eq!(parse_price("1,50"), None);
        assert_eq!(parse_price("1000000"), None);
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn counts_must_be_non_negative() {
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("2.5"), None);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        assert!(matches!(parse_id("5"), Err(AppError::NotFound)));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn take_files_only_removes_named_field() {
        let file = |name: &str| UploadedFile {
            file_name: name.into(),
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(b"png"),
        };
        let mut data = FormData::from_pairs([("add_land", "")])
            .with_file("images", file("a.png"))
            .with_file("other", file("b.png"))
            .with_file("images", file("c.png"));

        let images = data.take_files("images");
        assert_eq!(images.len(), 2);
        assert!(data.take_files("images").is_empty());
        assert_eq!(data.take_files("other").len(), 1);
        assert!(data.has("add_land"));
    }

    #[test]
    fn non_images_are_rejected() {
        let files = vec![UploadedFile {
            file_name: "notes.txt".into(),
            content_type: Some("text/plain".into()),
            bytes: Bytes::from_static(b"hi"),
        }];
        let errors = check_images("images", &files).unwrap_err();
        assert!(errors.contains("images"));

        let cleaned: Result<(), FieldErrors> = Err(FieldErrors::single("name", "This field is required."));
        let errors = with_images(cleaned, &files).unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("images"));
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "This field is required."))]
        name: String,
    }

    #[test]
    fn validation_errors_keep_field_messages() {
        let probe = Probe {
            name: String::new(),
        };
        let errors = FieldErrors::from_validation(probe.validate());
        assert_eq!(errors.messages("name"), ["This field is required."]);
        assert!(errors.messages("other").is_empty());
    }
}
