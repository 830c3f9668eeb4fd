use std::convert::TryFrom;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Record fields that hold outbound links.
pub const LINK_FIELDS: [&str; 9] = [
    "apply_link",
    "company_logo",
    "embed_link",
    "file_url",
    "image_url",
    "link",
    "pdf_file",
    "thumbnail_url",
    "video_link",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),
    #[error("URL must have a host")]
    MissingHost,
    #[error("Local addresses not allowed: {0}")]
    LocalAddress(String),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("{field} must be a string")]
    NotText { field: String },
}

/// A link that is safe to hand to a student's browser.
/// Guarantees: HTTP/HTTPS scheme, a non-local host
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLink {
    pub secure: bool,
    pub host: String,
    url: Url,
}

impl fmt::Display for ValidatedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl TryFrom<Url> for ValidatedLink {
    type Error = ValidationError;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            scheme => return Err(ValidationError::UnsupportedScheme(scheme.to_string())),
        };

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or(ValidationError::MissingHost)?
            .to_lowercase();

        if host == "localhost"
            || host.starts_with("127.")
            || host.starts_with("192.168.")
            || host.starts_with("10.")
        {
            return Err(ValidationError::LocalAddress(host));
        }

        Ok(ValidatedLink { secure, host, url })
    }
}

pub fn validate_link(value: &str) -> Result<ValidatedLink, ValidationError> {
    let url = Url::parse(value.trim())
        .map_err(|_| ValidationError::MalformedUrl(value.to_string()))?;
    ValidatedLink::try_from(url)
}

/// Checks every non-empty link field in a record body and rewrites each
/// one in its parsed form.
///
/// `video_link` also accepts a bare video id.
pub fn validate_links(body: &mut Map<String, Value>) -> Result<(), (String, ValidationError)> {
    for field in LINK_FIELDS {
        let text = match body.get(field) {
            None | Some(Value::Null) => continue,
            Some(Value::String(text)) if text.trim().is_empty() => continue,
            Some(Value::String(text)) => text,
            Some(_) => {
                return Err((
                    field.to_string(),
                    ValidationError::NotText {
                        field: field.to_string(),
                    },
                ));
            }
        };

        if field == "video_link" && examupdt_core::format::is_bare_video_id(text) {
            continue;
        }

        let link = validate_link(text).map_err(|err| (field.to_string(), err))?;
        body.insert(field.to_string(), Value::String(link.to_string()));
    }
    Ok(())
}
