/// Errors that can occur while extracting metadata from an OME-XML document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OmeXmlError {
    /// The input is not well-formed XML
    #[error("Malformed OME-XML document: {0}")]
    MalformedDocument(String),

    /// An expected element, attribute or annotation key is absent
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A schema level name other than image, pixels or plane
    #[error("Invalid domain '{0}': domain must be plane, pixels or image")]
    InvalidDomain(String),

    /// Values assumed to be shared by all images differ
    #[error("Inconsistent metadata across images: {0}")]
    InconsistentMetadata(String),

    /// Plane groups and acquisition dates do not line up
    #[error("Structural mismatch: {planes} plane groups but {dates} acquisition dates")]
    StructuralMismatch {
        /// Number of per-image plane groups
        planes: usize,
        /// Number of per-image acquisition dates
        dates: usize,
    },

    /// A hardware-setting annotation value is not the expected JSON array
    #[error("Malformed annotation '{key}': {reason}")]
    MalformedAnnotation {
        /// Annotation key
        key: String,
        /// What went wrong
        reason: String,
    },

    /// A number or date string that does not parse
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue {
        /// Field the value was read from
        field: String,
        /// The offending raw value
        value: String,
    },

    /// Timezone offset outside of a day
    #[error("Invalid timezone offset: {0} hours")]
    InvalidTimezone(i32),
}

impl OmeXmlError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        OmeXmlError::MissingField(field.into())
    }

    pub(crate) fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        OmeXmlError::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn malformed_annotation(key: impl Into<String>, reason: impl Into<String>) -> Self {
        OmeXmlError::MalformedAnnotation {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for OmeXmlError {
    fn from(e: quick_xml::Error) -> Self {
        OmeXmlError::MalformedDocument(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OmeXmlError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        OmeXmlError::MalformedDocument(e.to_string())
    }
}

impl From<std::str::Utf8Error> for OmeXmlError {
    fn from(e: std::str::Utf8Error) -> Self {
        OmeXmlError::MalformedDocument(e.to_string())
    }
}
