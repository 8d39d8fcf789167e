use crate::boundary;
use crate::constants;
use crate::content_disposition::{base_name, ContentDisposition};
use crate::helpers;
use crate::sniff;
use crate::state::{FormState, WritingStage};
use crate::{FileSource, PartWriter};
use bytes::{BufMut, BytesMut};
use http::header::HeaderMap;
#[cfg(feature = "json")]
use serde::Serialize;
use std::fmt::{self, Debug, Formatter};
use std::io::{self, Seek, SeekFrom, Write};

/// Writes a `multipart/form-data` body into any [`Write`] sink.
///
/// Parts are written in the order they are added and their content is streamed
/// straight from the source into the sink, nothing is buffered beyond the part
/// headers. Call [`close`](FormBuilder::close) (or [`finish`](FormBuilder::finish))
/// exactly once when done to write the closing boundary, then send the sink's
/// bytes with [`content_type`](FormBuilder::content_type) as the request's
/// `Content-Type` header.
///
/// If any add fails, the body is left in an unspecified state and must not be
/// sent.
///
/// # Examples
///
/// ```
/// use multiform::{FormBuilder, NamedReader};
///
/// # fn run() -> multiform::Result<()> {
/// let mut form = FormBuilder::with_boundary(Vec::new(), "X-BOUNDARY")?;
///
/// form.add_field("purpose", "assistants")?;
/// form.add_file_with_reader("file", &b"hello"[..], "notes/hello.txt")?;
///
/// let content_type = form.content_type();
/// let body = form.finish()?;
///
/// assert_eq!(content_type, "multipart/form-data; boundary=X-BOUNDARY");
/// assert_eq!(
///     body,
///     b"--X-BOUNDARY\r\n\
///       Content-Disposition: form-data; name=\"purpose\"\r\n\r\n\
///       assistants\r\n\
///       --X-BOUNDARY\r\n\
///       Content-Disposition: form-data; name=\"file\"; filename=\"hello.txt\"\r\n\r\n\
///       hello\r\n\
///       --X-BOUNDARY--\r\n"
/// );
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub struct FormBuilder<W: Write> {
    writer: W,
    state: FormState,
}

impl<W: Write> FormBuilder<W> {
    /// Construct a new `FormBuilder` writing into `writer`, with a random boundary.
    pub fn new(writer: W) -> FormBuilder<W> {
        FormBuilder {
            writer,
            state: FormState::new(boundary::generate()),
        }
    }

    /// Construct a new `FormBuilder` with the given boundary.
    ///
    /// The boundary must be 1 to 70 characters from the RFC 2046 boundary
    /// alphabet and must not end with a space.
    pub fn with_boundary<B: Into<String>>(writer: W, boundary: B) -> crate::Result<FormBuilder<W>> {
        let boundary = boundary.into();
        boundary::validate(&boundary)?;

        Ok(FormBuilder {
            writer,
            state: FormState::new(boundary),
        })
    }

    /// The boundary separating the parts of this body.
    pub fn boundary(&self) -> &str {
        &self.state.boundary
    }

    /// The `Content-Type` header value for the request carrying this body,
    /// `multipart/form-data; boundary=...`.
    pub fn content_type(&self) -> String {
        boundary::form_data_content_type(&self.state.boundary)
    }

    /// Whether [`close`](FormBuilder::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.stage == WritingStage::Closed
    }

    /// Number of parts opened so far.
    pub fn parts_written(&self) -> usize {
        self.state.next_part_idx
    }

    /// Starts a new part with the given headers and returns a writer for its
    /// body.
    ///
    /// The headers are written sorted by name. Any previous part ends here.
    pub fn create_part(&mut self, headers: &HeaderMap) -> crate::Result<PartWriter<'_, W>> {
        self.ensure_open()?;

        let boundary = &self.state.boundary;
        let mut buf = BytesMut::with_capacity(boundary.len() + 8 + headers.len() * 64);

        if self.state.stage == WritingStage::WritingParts {
            buf.put_slice(constants::CRLF.as_bytes());
        }
        buf.put_slice(constants::BOUNDARY_EXT.as_bytes());
        buf.put_slice(boundary.as_bytes());
        buf.put_slice(constants::CRLF.as_bytes());

        helpers::write_header_map(&mut buf, headers);
        buf.put_slice(constants::CRLF.as_bytes());

        self.writer.write_all(&buf)?;

        let idx = self.state.next_part_idx;
        self.state.next_part_idx += 1;
        self.state.stage = WritingStage::WritingParts;

        #[cfg(feature = "log")]
        log::trace!("opened part {} with {} header(s)", idx, headers.len());

        Ok(PartWriter::new(&mut self.writer, idx))
    }

    /// Adds a file part named after the source's own [`name`](FileSource::name).
    ///
    /// Only the last path segment of the name is used as the `filename`. The
    /// part carries the default `application/octet-stream` content type; use
    /// [`add_file_with_detected_type`](FormBuilder::add_file_with_detected_type)
    /// to sniff a better one.
    pub fn add_file<F>(&mut self, field_name: &str, file: &mut F) -> crate::Result<()>
    where
        F: FileSource + ?Sized,
    {
        let file_name = source_file_name(file);
        if file_name.is_empty() {
            return Err(crate::Error::EmptyFileName);
        }

        let headers = ContentDisposition::file(field_name, &file_name)?
            .into_headers(Some(constants::APPLICATION_OCTET_STREAM))?;

        let mut part = self.create_part(&headers)?;
        io::copy(file, &mut part)?;

        Ok(())
    }

    /// Adds a file part streamed from an arbitrary reader.
    ///
    /// When `file_name` is empty the source's [`name`](FileSource::name) is
    /// used, if it has one; otherwise the part is sent with an empty
    /// `filename`. The source's [`content_type`](FileSource::content_type),
    /// if any, becomes the part's `Content-Type`. The reader is consumed in a
    /// single forward pass.
    pub fn add_file_with_reader<R>(&mut self, field_name: &str, mut reader: R, file_name: &str) -> crate::Result<()>
    where
        R: FileSource,
    {
        let file_name = if file_name.is_empty() {
            reader.name().map(|name| name.into_owned()).unwrap_or_default()
        } else {
            file_name.to_owned()
        };
        let content_type = reader.content_type();

        let headers = ContentDisposition::file(field_name, &file_name)?
            .into_headers(content_type.as_ref().map(|ct| ct.as_ref()))?;

        let mut part = self.create_part(&headers)?;
        io::copy(&mut reader, &mut part)?;

        Ok(())
    }

    /// Adds a file part whose `Content-Type` is detected from the file's
    /// extension or, failing that, its first 512 bytes.
    ///
    /// The file is rewound to its start before sniffing and again before its
    /// content is copied, so the whole file is always sent. An empty file or
    /// field name, or a closed form, is rejected before the file is touched.
    pub fn add_file_with_detected_type<F>(&mut self, field_name: &str, file: &mut F) -> crate::Result<()>
    where
        F: FileSource + Seek + ?Sized,
    {
        let file_name = source_file_name(file);
        if file_name.is_empty() {
            return Err(crate::Error::EmptyFileName);
        }

        // Reject bad input before the caller's stream is moved.
        let disposition = ContentDisposition::file(field_name, &file_name)?;
        self.ensure_open()?;

        file.seek(SeekFrom::Start(0))?;
        let content_type = sniff::detect_content_type(file, &file_name)?;
        let headers = disposition.into_headers(Some(content_type))?;

        file.seek(SeekFrom::Start(0))?;

        let mut part = self.create_part(&headers)?;
        io::copy(file, &mut part)?;

        Ok(())
    }

    /// Adds a plain `name=value` part, without `filename` or `Content-Type`.
    pub fn add_field(&mut self, field_name: &str, value: &str) -> crate::Result<()> {
        let headers = ContentDisposition::field(field_name)?.into_headers(None)?;

        let mut part = self.create_part(&headers)?;
        part.write_all(value.as_bytes())?;

        Ok(())
    }

    /// Adds a part holding `value` serialized as JSON, with an
    /// `application/json` content type.
    ///
    /// # Optional
    ///
    /// This requires the optional `json` feature to be enabled.
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    pub fn add_json_field<T>(&mut self, field_name: &str, value: &T) -> crate::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let headers = ContentDisposition::field(field_name)?.into_headers(Some(mime::APPLICATION_JSON.as_ref()))?;

        let mut part = self.create_part(&headers)?;
        serde_json::to_writer(&mut part, value).map_err(crate::Error::EncodeJson)
    }

    /// Writes the closing boundary and flushes the sink.
    ///
    /// Must be called exactly once. Afterwards every add, and a second
    /// `close`, fails with [`Error::Closed`](crate::Error::Closed).
    pub fn close(&mut self) -> crate::Result<()> {
        self.ensure_open()?;

        let wrote_parts = self.state.stage == WritingStage::WritingParts;
        self.state.stage = WritingStage::Closed;

        let boundary = &self.state.boundary;
        let mut buf = BytesMut::with_capacity(boundary.len() + 8);

        if wrote_parts {
            buf.put_slice(constants::CRLF.as_bytes());
        }
        buf.put_slice(constants::BOUNDARY_EXT.as_bytes());
        buf.put_slice(boundary.as_bytes());
        buf.put_slice(constants::BOUNDARY_EXT.as_bytes());
        buf.put_slice(constants::CRLF.as_bytes());

        self.writer.write_all(&buf)?;
        self.writer.flush()?;

        #[cfg(feature = "log")]
        log::trace!("closed multipart form after {} part(s)", self.state.next_part_idx);

        Ok(())
    }

    /// Closes the form and returns the underlying writer.
    pub fn finish(mut self) -> crate::Result<W> {
        self.close()?;
        Ok(self.writer)
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Returns the underlying writer without closing the form.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_open(&self) -> crate::Result<()> {
        if self.state.stage == WritingStage::Closed {
            Err(crate::Error::Closed)
        } else {
            Ok(())
        }
    }
}

impl<W: Write> Debug for FormBuilder<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBuilder")
            .field("boundary", &self.state.boundary)
            .field("stage", &self.state.stage)
            .field("parts", &self.state.next_part_idx)
            .finish()
    }
}

fn source_file_name<F: FileSource + ?Sized>(file: &F) -> String {
    file.name()
        .map(|name| base_name(&name).to_owned())
        .unwrap_or_default()
}
