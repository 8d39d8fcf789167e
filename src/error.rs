use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while writing a multipart body and in other
/// operations.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// A part was added with an empty field name.
    #[display(fmt = "field name cannot be empty")]
    EmptyFieldName,

    /// A file part could not derive a usable file name from its source.
    #[display(fmt = "file name cannot be empty")]
    EmptyFileName,

    /// The form was already closed, no more parts or boundaries can be written.
    #[display(fmt = "multipart form is already closed")]
    Closed,

    /// The boundary is not a valid RFC 2046 boundary.
    #[display(fmt = "invalid multipart boundary: {:?}", boundary)]
    InvalidBoundary { boundary: String },

    /// Failed to encode a part header value to
    /// [`HeaderValue`](http::header::HeaderValue) type.
    #[display(fmt = "failed to encode part header value: {}", cause)]
    InvalidHeaderValue { value: Vec<u8>, cause: BoxError },

    /// Reading the source, writing the body or seeking failed.
    #[display(fmt = "stream I/O failed: {}", _0)]
    Io(std::io::Error),

    /// The `Content-Type` header is not `multipart/form-data`.
    #[display(fmt = "Content-Type is not multipart/form-data")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[display(fmt = "Failed to convert Content-Type to `mime::Mime` type: {}", _0)]
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[display(fmt = "multipart boundary not found in Content-Type")]
    NoBoundary,

    /// Failed to encode the field value as `JSON` in
    /// [`add_json_field`](crate::FormBuilder::add_json_field) method.
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    #[display(fmt = "failed to encode field value as JSON: {}", _0)]
    EncodeJson(serde_json::Error),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::InvalidHeaderValue { cause, .. } => Some(cause.as_ref()),
            Error::DecodeContentType(err) => Some(err),
            #[cfg(feature = "json")]
            Error::EncodeJson(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_io_error_keeps_source() {
        let err = Error::from(io::Error::new(io::ErrorKind::UnexpectedEof, "short read"));
        assert_eq!(err.to_string(), "stream I/O failed: short read");
        assert!(err.source().is_some());

        assert!(Error::EmptyFieldName.source().is_none());
    }

    #[test]
    fn test_invalid_boundary_display() {
        let err = Error::InvalidBoundary {
            boundary: "bad\"boundary".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid multipart boundary: \"bad\\\"boundary\"");
    }
}
