use mime::Mime;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A readable upload source that may describe itself.
///
/// Both accessors are optional capabilities: the default implementations
/// report nothing, so any reader can be turned into a source with an empty
/// `impl`. [`FormBuilder`](crate::FormBuilder) uses `name()` for the part's
/// `filename` when the caller does not pass one, and `content_type()` for the
/// part's `Content-Type` header.
pub trait FileSource: Read {
    /// The name of the source, typically a file path. Directory components are
    /// stripped before it is used as a `filename`.
    fn name(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// The content type of the source's bytes.
    fn content_type(&self) -> Option<Mime> {
        None
    }
}

impl FileSource for &[u8] {}

/// A bare `File` has no name, so [`add_file`](crate::FormBuilder::add_file)
/// rejects it with [`Error::EmptyFileName`](crate::Error::EmptyFileName).
/// Wrap it in an [`UploadFile`] or pass a name to
/// [`add_file_with_reader`](crate::FormBuilder::add_file_with_reader).
impl FileSource for File {}

impl FileSource for io::Empty {}

impl<T: AsRef<[u8]>> FileSource for io::Cursor<T> {}

impl<R: FileSource + ?Sized> FileSource for &mut R {
    fn name(&self) -> Option<Cow<'_, str>> {
        (**self).name()
    }

    fn content_type(&self) -> Option<Mime> {
        (**self).content_type()
    }
}

impl<R: FileSource + ?Sized> FileSource for Box<R> {
    fn name(&self) -> Option<Cow<'_, str>> {
        (**self).name()
    }

    fn content_type(&self) -> Option<Mime> {
        (**self).content_type()
    }
}

/// An open file together with the path it was opened from.
///
/// `std::fs::File` does not remember its path, this type does, so it can be
/// handed to [`FormBuilder::add_file`](crate::FormBuilder::add_file) and
/// [`FormBuilder::add_file_with_detected_type`](crate::FormBuilder::add_file_with_detected_type)
/// which name the part after the file.
#[derive(Debug)]
pub struct UploadFile {
    file: File,
    path: PathBuf,
}

impl UploadFile {
    /// Opens the file at `path` in read-only mode.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<UploadFile> {
        let path = path.as_ref();
        let file = File::open(path)?;

        Ok(UploadFile {
            file,
            path: path.to_owned(),
        })
    }

    /// Wraps an already open file.
    pub fn new<P: Into<PathBuf>>(file: File, path: P) -> UploadFile {
        UploadFile {
            file,
            path: path.into(),
        }
    }

    /// The path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a reference to the underlying file.
    pub fn get_ref(&self) -> &File {
        &self.file
    }

    /// Unwraps this `UploadFile`, returning the underlying file.
    pub fn into_inner(self) -> File {
        self.file
    }
}

impl Read for UploadFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for UploadFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl FileSource for UploadFile {
    fn name(&self) -> Option<Cow<'_, str>> {
        Some(self.path.to_string_lossy())
    }
}

/// Any reader with an explicit name and content type attached.
///
/// # Examples
///
/// ```
/// use multiform::{FileSource, NamedReader};
///
/// let reader = NamedReader::new(&b"{}"[..])
///     .with_name("payload.json")
///     .with_content_type(mime::APPLICATION_JSON);
///
/// assert_eq!(reader.name().as_deref(), Some("payload.json"));
/// assert_eq!(reader.content_type(), Some(mime::APPLICATION_JSON));
/// ```
#[derive(Debug)]
pub struct NamedReader<R> {
    inner: R,
    name: Option<String>,
    content_type: Option<Mime>,
}

impl<R: Read> NamedReader<R> {
    /// Wraps `inner` with neither a name nor a content type.
    pub fn new(inner: R) -> NamedReader<R> {
        NamedReader {
            inner,
            name: None,
            content_type: None,
        }
    }

    /// Sets the name reported through [`FileSource::name`].
    pub fn with_name<N: Into<String>>(mut self, name: N) -> NamedReader<R> {
        self.name = Some(name.into());
        self
    }

    /// Sets the content type reported through [`FileSource::content_type`].
    pub fn with_content_type(mut self, content_type: Mime) -> NamedReader<R> {
        self.content_type = Some(content_type);
        self
    }

    /// Returns a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwraps this `NamedReader`, returning the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for NamedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Seek> Seek for NamedReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<R: Read> FileSource for NamedReader<R> {
    fn name(&self) -> Option<Cow<'_, str>> {
        self.name.as_deref().map(Cow::Borrowed)
    }

    fn content_type(&self) -> Option<Mime> {
        self.content_type.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plain_readers_report_nothing() {
        let reader: &[u8] = b"abc";
        assert!(reader.name().is_none());
        assert!(reader.content_type().is_none());

        let cursor = io::Cursor::new(vec![1u8, 2, 3]);
        assert!(cursor.name().is_none());
    }

    #[test]
    fn test_named_reader() {
        let mut reader = NamedReader::new(io::Cursor::new(b"hello".to_vec()))
            .with_name("dir/hello.txt")
            .with_content_type(mime::TEXT_PLAIN);

        assert_eq!(reader.name().as_deref(), Some("dir/hello.txt"));
        assert_eq!(reader.content_type(), Some(mime::TEXT_PLAIN));

        let by_ref = &mut reader;
        assert_eq!(by_ref.name().as_deref(), Some("dir/hello.txt"));

        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello");

        reader.seek(SeekFrom::Start(1)).unwrap();
        text.clear();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "ello");
    }

    #[test]
    fn test_boxed_source() {
        let boxed: Box<dyn FileSource> = Box::new(NamedReader::new(&b"x"[..]).with_name("x.bin"));
        assert_eq!(boxed.name().as_deref(), Some("x.bin"));
    }

    #[test]
    fn test_upload_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"file contents").unwrap();

        let mut file = UploadFile::open(tmp.path()).unwrap();
        assert_eq!(file.path(), tmp.path());
        assert_eq!(file.name().as_deref(), tmp.path().to_str());
        assert!(file.content_type().is_none());

        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "file contents");

        file.seek(SeekFrom::Start(5)).unwrap();
        contents.clear();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "contents");

        assert!(UploadFile::open(tmp.path().with_extension("missing")).is_err());
    }
}
