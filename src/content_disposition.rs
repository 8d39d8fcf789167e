use crate::helpers;
use bytes::{BufMut, Bytes, BytesMut};
use http::header::{self, HeaderMap, HeaderValue};
use std::borrow::Cow;

/// The `Content-Disposition` of a single `form-data` part.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ContentDisposition<'a> {
    pub(crate) field_name: &'a str,
    pub(crate) file_name: Option<&'a str>,
}

impl<'a> ContentDisposition<'a> {
    /// A value-only part.
    pub(crate) fn field(field_name: &'a str) -> crate::Result<ContentDisposition<'a>> {
        if field_name.is_empty() {
            return Err(crate::Error::EmptyFieldName);
        }

        Ok(ContentDisposition {
            field_name,
            file_name: None,
        })
    }

    /// A file part. Only the last path segment of `file_name` is kept.
    pub(crate) fn file(field_name: &'a str, file_name: &'a str) -> crate::Result<ContentDisposition<'a>> {
        let mut disposition = ContentDisposition::field(field_name)?;
        disposition.file_name = Some(base_name(file_name));
        Ok(disposition)
    }

    pub(crate) fn header_value(&self) -> crate::Result<HeaderValue> {
        let mut buf = BytesMut::with_capacity(
            32 + self.field_name.len() + self.file_name.map(|name| name.len()).unwrap_or_default(),
        );

        buf.put_slice(b"form-data; name=\"");
        buf.put_slice(escape_quotes(self.field_name).as_bytes());
        buf.put_u8(b'"');

        if let Some(file_name) = self.file_name {
            buf.put_slice(b"; filename=\"");
            buf.put_slice(escape_quotes(file_name).as_bytes());
            buf.put_u8(b'"');
        }

        helpers::header_value(buf.freeze())
    }

    /// Builds the part headers, with an optional `Content-Type`.
    pub(crate) fn into_headers(self, content_type: Option<&str>) -> crate::Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(2);

        headers.insert(header::CONTENT_DISPOSITION, self.header_value()?);

        if let Some(content_type) = content_type.filter(|ct| !ct.is_empty()) {
            headers.insert(
                header::CONTENT_TYPE,
                helpers::header_value(Bytes::copy_from_slice(content_type.as_bytes()))?,
            );
        }

        Ok(headers)
    }
}

/// Escapes backslashes and double quotes with a backslash so the value can be
/// embedded in a quoted header parameter. Nothing else is touched.
pub fn escape_quotes(value: &str) -> Cow<'_, str> {
    if !value.contains(|c: char| c == '\\' || c == '"') {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c == '\\' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    Cow::Owned(escaped)
}

/// Returns the last path segment of `path`, ignoring trailing separators.
///
/// Only the platform's path separators are considered, so on Unix a backslash
/// is an ordinary file name character. A path made only of separators yields an
/// empty string.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(std::path::is_separator);

    match trimmed.rfind(std::path::is_separator) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape_quotes(value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes("plain name"), "plain name");
        assert!(matches!(escape_quotes("plain name"), Cow::Borrowed(_)));

        assert_eq!(escape_quotes(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_quotes(r"back\slash"), r"back\\slash");
        assert_eq!(escape_quotes(r#"\""#), r#"\\\""#);
        assert_eq!(escape_quotes("semi;colon 'single' 你好"), "semi;colon 'single' 你好");
    }

    #[test]
    fn test_escape_quotes_round_trip() {
        let samples = [
            "",
            "name",
            r#"a"b"#,
            r"a\b",
            r#"\\""\"#,
            r#"trailing\"#,
            "\"quoted\" and \\escaped\\ 你好",
        ];

        for sample in samples.iter() {
            let escaped = escape_quotes(sample);
            let extra = escaped.len() - sample.len();
            let specials = sample.chars().filter(|c| *c == '"' || *c == '\\').count();
            assert_eq!(extra, specials, "escaped {:?} as {:?}", sample, escaped);
            assert_eq!(&unescape_quotes(&escaped), sample);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_base_name() {
        assert_eq!(base_name("photo.png"), "photo.png");
        assert_eq!(base_name("/tmp/uploads/photo.png"), "photo.png");
        assert_eq!(base_name("../../etc/passwd"), "passwd");
        assert_eq!(base_name("dir/sub/"), "sub");
        assert_eq!(base_name("/"), "");
        assert_eq!(base_name(""), "");
        assert_eq!(base_name(r"C:\odd\name.txt"), r"C:\odd\name.txt");
    }

    #[test]
    fn test_field_header_value() {
        let disposition = ContentDisposition::field("my_field").unwrap();
        assert_eq!(disposition.header_value().unwrap(), "form-data; name=\"my_field\"");

        let disposition = ContentDisposition::field(r#"my "field""#).unwrap();
        assert_eq!(
            disposition.header_value().unwrap(),
            r#"form-data; name="my \"field\"""#
        );
    }

    #[test]
    fn test_file_header_value() {
        let disposition = ContentDisposition::file("file", "uploads/a \"b\".png").unwrap();
        assert_eq!(disposition.file_name, Some("a \"b\".png"));
        assert_eq!(
            disposition.header_value().unwrap(),
            r#"form-data; name="file"; filename="a \"b\".png""#
        );

        let disposition = ContentDisposition::file("file", "").unwrap();
        assert_eq!(disposition.header_value().unwrap(), r#"form-data; name="file"; filename="""#);
    }

    #[test]
    fn test_utf8_file_name() {
        let disposition = ContentDisposition::file("file", "你好.txt").unwrap();
        let value = disposition.header_value().unwrap();
        assert_eq!(value.as_bytes(), "form-data; name=\"file\"; filename=\"你好.txt\"".as_bytes());
    }

    #[test]
    fn test_rejects_empty_field_name_and_control_chars() {
        assert_eq!(ContentDisposition::field("").unwrap_err(), crate::Error::EmptyFieldName);
        assert_eq!(ContentDisposition::file("", "a.png").unwrap_err(), crate::Error::EmptyFieldName);

        let disposition = ContentDisposition::field("line\r\nbreak").unwrap();
        assert!(matches!(
            disposition.header_value(),
            Err(crate::Error::InvalidHeaderValue { .. })
        ));
    }

    #[test]
    fn test_into_headers() {
        let headers = ContentDisposition::file("file", "a.png")
            .unwrap()
            .into_headers(Some("image/png"))
            .unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");

        let headers = ContentDisposition::field("name").unwrap().into_headers(None).unwrap();
        assert_eq!(headers.len(), 1);
        assert!(headers.get(header::CONTENT_TYPE).is_none());

        let headers = ContentDisposition::field("name").unwrap().into_headers(Some("")).unwrap();
        assert!(headers.get(header::CONTENT_TYPE).is_none());
    }
}
