//! Input validation for untrusted data.
//!
//! Everything arriving over HTTP is checked here once, before it reaches
//! the gateway.

use sitecanvas_core::Element;
use thiserror::Error;

/// Maximum length for project IDs (UUIDs are 36 chars).
pub const MAX_PROJECT_ID_LEN: usize = 64;
/// Maximum length for caller IDs.
pub const MAX_USER_ID_LEN: usize = 128;
/// Maximum length for element IDs.
pub const MAX_ELEMENT_ID_LEN: usize = 64;
/// Maximum length for deployment IDs.
pub const MAX_DEPLOYMENT_ID_LEN: usize = 128;
/// Maximum length of any single text prop.
pub const MAX_TEXT_CONTENT_LEN: usize = 65_536;
/// Maximum project title length.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum elements per project.
pub const MAX_ELEMENTS: usize = 10_000;

/// Props that carry free text.
const TEXT_PROPS: [&str; 9] = [
    "children", "text", "title", "subtitle", "content", "links", "fields", "placeholder", "alt",
];

/// Validation error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Project ID exceeds maximum length.
    #[error("project id too long (max {MAX_PROJECT_ID_LEN} chars)")]
    ProjectIdTooLong,
    /// Project ID is empty or contains invalid characters.
    #[error("project id contains invalid characters")]
    ProjectIdInvalidChars,
    /// Caller ID exceeds maximum length.
    #[error("user id too long (max {MAX_USER_ID_LEN} chars)")]
    UserIdTooLong,
    /// Caller ID is empty or contains invalid characters.
    #[error("user id contains invalid characters")]
    UserIdInvalidChars,
    /// Element ID exceeds maximum length.
    #[error("element id too long (max {MAX_ELEMENT_ID_LEN} chars)")]
    ElementIdTooLong,
    /// Element ID is empty or contains invalid characters.
    #[error("element id contains invalid characters")]
    ElementIdInvalidChars,
    /// Deployment ID is empty, too long or contains invalid characters.
    #[error("invalid deployment id")]
    DeploymentIdInvalid,
    /// A text prop exceeds maximum length.
    #[error("text content too long (max {MAX_TEXT_CONTENT_LEN} bytes)")]
    TextContentTooLong,
    /// Too many elements in one project.
    #[error("too many elements (max {MAX_ELEMENTS})")]
    TooManyElements,
    /// Title is blank or too long.
    #[error("title must be 1-{MAX_TITLE_LEN} characters")]
    InvalidTitle,
}

impl ValidationError {
    /// Short label for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProjectIdTooLong | Self::ProjectIdInvalidChars => "project_id",
            Self::UserIdTooLong | Self::UserIdInvalidChars => "user_id",
            Self::ElementIdTooLong | Self::ElementIdInvalidChars => "element_id",
            Self::DeploymentIdInvalid => "deployment_id",
            Self::TextContentTooLong => "text_content",
            Self::TooManyElements => "element_count",
            Self::InvalidTitle => "title",
        }
    }
}

/// Check if a character is valid for IDs (alphanumeric, hyphen, or underscore).
fn is_valid_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Validate a project ID.
///
/// # Errors
///
/// Returns [`ValidationError::ProjectIdTooLong`] or
/// [`ValidationError::ProjectIdInvalidChars`].
pub fn validate_project_id(id: &str) -> Result<(), ValidationError> {
    if id.len() > MAX_PROJECT_ID_LEN {
        return Err(ValidationError::ProjectIdTooLong);
    }
    if id.is_empty() || !id.chars().all(is_valid_id_char) {
        return Err(ValidationError::ProjectIdInvalidChars);
    }
    Ok(())
}

/// Validate a caller ID.
///
/// Caller ids are opaque, so `.`, `@` and `:` are allowed on top of the id
/// characters to fit emails and prefixed ids.
///
/// # Errors
///
/// Returns [`ValidationError::UserIdTooLong`] or
/// [`ValidationError::UserIdInvalidChars`].
pub fn validate_user_id(id: &str) -> Result<(), ValidationError> {
    if id.len() > MAX_USER_ID_LEN {
        return Err(ValidationError::UserIdTooLong);
    }
    if id.is_empty() || !id.chars().all(|c| is_valid_id_char(c) || matches!(c, '.' | '@' | ':')) {
        return Err(ValidationError::UserIdInvalidChars);
    }
    Ok(())
}

/// Validate an element ID.
///
/// # Errors
///
/// Returns [`ValidationError::ElementIdTooLong`] or
/// [`ValidationError::ElementIdInvalidChars`].
pub fn validate_element_id(id: &str) -> Result<(), ValidationError> {
    if id.len() > MAX_ELEMENT_ID_LEN {
        return Err(ValidationError::ElementIdTooLong);
    }
    if id.is_empty() || !id.chars().all(is_valid_id_char) {
        return Err(ValidationError::ElementIdInvalidChars);
    }
    Ok(())
}

/// Validate a deployment ID.
///
/// # Errors
///
/// Returns [`ValidationError::DeploymentIdInvalid`].
pub fn validate_deployment_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_DEPLOYMENT_ID_LEN || !id.chars().all(is_valid_id_char) {
        return Err(ValidationError::DeploymentIdInvalid);
    }
    Ok(())
}

/// Validate text content length.
///
/// # Errors
///
/// Returns [`ValidationError::TextContentTooLong`].
pub fn validate_text_content(text: &str) -> Result<(), ValidationError> {
    if text.len() > MAX_TEXT_CONTENT_LEN {
        return Err(ValidationError::TextContentTooLong);
    }
    Ok(())
}

/// Validate a project title.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTitle`] if it is blank or too long.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::InvalidTitle);
    }
    Ok(())
}

/// Validate an element list: count, ids and text lengths.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_elements(elements: &[Element]) -> Result<(), ValidationError> {
    if elements.len() > MAX_ELEMENTS {
        return Err(ValidationError::TooManyElements);
    }
    for element in elements {
        validate_element_id(element.id.as_str())?;
        for key in TEXT_PROPS {
            if let Some(text) = element.props.get(key) {
                validate_text_content(text)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecanvas_core::{ElementKind, Props};

    #[test]
    fn test_valid_project_ids() {
        assert!(validate_project_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_project_id("landing_page").is_ok());
        assert!(validate_project_id("a").is_ok());
    }

    #[test]
    fn test_invalid_project_ids() {
        assert_eq!(validate_project_id(""), Err(ValidationError::ProjectIdInvalidChars));
        assert!(validate_project_id("has spaces").is_err());
        assert!(validate_project_id("../../../etc/passwd").is_err());
        assert!(validate_project_id("path\\traversal").is_err());
        assert!(validate_project_id("contains<script>").is_err());
        assert_eq!(
            validate_project_id(&"x".repeat(MAX_PROJECT_ID_LEN + 1)),
            Err(ValidationError::ProjectIdTooLong)
        );
        assert!(validate_project_id(&"x".repeat(MAX_PROJECT_ID_LEN)).is_ok());
    }

    #[test]
    fn test_user_ids() {
        assert!(validate_user_id("user-1").is_ok());
        assert!(validate_user_id("ada@example.com").is_ok());
        assert!(validate_user_id("auth0:abc123").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("two words").is_err());
        assert!(validate_user_id(&"u".repeat(MAX_USER_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_element_ids() {
        assert!(validate_element_id("element_1700000000000_ab12cd").is_ok());
        assert!(validate_element_id("").is_err());
        assert!(validate_element_id("a b").is_err());
    }

    #[test]
    fn test_deployment_ids() {
        assert!(validate_deployment_id("dpl_123abc").is_ok());
        assert!(validate_deployment_id("mock_1700000000000001").is_ok());
        assert!(validate_deployment_id("").is_err());
        assert!(validate_deployment_id("a/b").is_err());
    }

    #[test]
    fn test_titles() {
        assert!(validate_title("Landing").is_ok());
        assert_eq!(validate_title("   "), Err(ValidationError::InvalidTitle));
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN)).is_ok());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_elements() {
        let ok = vec![Element::new(ElementKind::Button), Element::new(ElementKind::Hero)];
        assert!(validate_elements(&ok).is_ok());

        let long = Element::new(ElementKind::Text)
            .with_props(Props::default().with("children", "x".repeat(MAX_TEXT_CONTENT_LEN + 1)));
        assert_eq!(validate_elements(&[long]), Err(ValidationError::TextContentTooLong));

        let many = vec![Element::new(ElementKind::Text); MAX_ELEMENTS + 1];
        assert_eq!(validate_elements(&many), Err(ValidationError::TooManyElements));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ValidationError::TooManyElements.kind(), "element_count");
        assert!(ValidationError::TooManyElements.to_string().contains("10000"));
        assert!(ValidationError::ProjectIdTooLong.to_string().contains("64"));
    }
}
