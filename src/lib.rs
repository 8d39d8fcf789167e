//! A streaming `multipart/form-data` body writer for file uploads.
//!
//! [`FormBuilder`] writes parts straight into any [`std::io::Write`] sink:
//! plain fields, files read from disk, or arbitrary readers. File contents are
//! copied as they are read, so a large upload is never held in memory. When
//! the caller does not know a file's content type,
//! [`add_file_with_detected_type`](FormBuilder::add_file_with_detected_type)
//! infers one from the file's extension or its leading magic bytes.
//!
//! # Examples
//!
//! ```no_run
//! use multiform::{FormBuilder, UploadFile};
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut body = Vec::new();
//! let mut form = FormBuilder::new(&mut body);
//!
//! form.add_field("model", "image-edit")?;
//!
//! let mut image = UploadFile::open("./assets/cat.webp")?;
//! form.add_file_with_detected_type("image", &mut image)?;
//!
//! let content_type = form.content_type();
//! form.close()?;
//!
//! // Send `body` with `Content-Type: {content_type}`.
//! # let _ = content_type;
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! - `json`: adds [`FormBuilder::add_json_field`].
//! - `log`: emits `trace` records through the [`log`](https://docs.rs/log) crate.

#![cfg_attr(nightly, feature(doc_cfg))]

pub use http;
pub use mime;

pub use content_disposition::{base_name, escape_quotes};
pub use error::Error;
pub use form::FormBuilder;
pub use part::PartWriter;
pub use sniff::{content_type_from_extension, detect_content_type, sniff_bytes};
pub use source::{FileSource, NamedReader, UploadFile};

mod boundary;
mod constants;
mod content_disposition;
mod error;
mod form;
mod helpers;
mod part;
mod sniff;
mod source;
mod state;

/// A Result type often returned from methods that can have `multiform` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses a `multipart/form-data` `Content-Type` header value to extract the
/// boundary value.
///
/// This is the inverse of [`FormBuilder::content_type`]. Use it to check that
/// a `Content-Type` header received or built elsewhere matches the boundary a
/// body was written with.
///
/// # Errors
///
/// [`Error::DecodeContentType`] if the value is not a MIME type,
/// [`Error::NoMultipart`] if it is not `multipart/form-data`, and
/// [`Error::NoBoundary`] if it has no `boundary` parameter.
///
/// # Examples
///
/// ```
/// use multiform::FormBuilder;
///
/// let form = FormBuilder::with_boundary(Vec::new(), "upload:1").unwrap();
/// assert_eq!(form.content_type(), "multipart/form-data; boundary=\"upload:1\"");
/// assert_eq!(multiform::parse_boundary(form.content_type()).unwrap(), "upload:1");
///
/// assert!(multiform::parse_boundary("application/json").is_err());
/// ```
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if !(m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA) {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}
