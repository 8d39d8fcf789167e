use crate::constants;
use bytes::{BufMut, Bytes, BytesMut};
use http::header::{HeaderMap, HeaderName, HeaderValue};

pub(crate) fn header_value(raw: Bytes) -> crate::Result<HeaderValue> {
    HeaderValue::from_maybe_shared(raw.clone()).map_err(|err| crate::Error::InvalidHeaderValue {
        value: raw.to_vec(),
        cause: err.into(),
    })
}

/// Serializes `headers` as MIME header lines, sorted by name, each name in its
/// canonical `Title-Case` form.
pub(crate) fn write_header_map(buf: &mut BytesMut, headers: &HeaderMap) {
    let mut names: Vec<&HeaderName> = headers.keys().collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    for name in names {
        for value in headers.get_all(name) {
            put_canonical_name(buf, name.as_str());
            buf.put_slice(constants::HEADER_SEP.as_bytes());
            buf.put_slice(value.as_bytes());
            buf.put_slice(constants::CRLF.as_bytes());
        }
    }
}

fn put_canonical_name(buf: &mut BytesMut, name: &str) {
    let mut upper = true;
    for b in name.bytes() {
        buf.put_u8(if upper { b.to_ascii_uppercase() } else { b });
        upper = b == b'-';
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn test_write_header_map() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("form-data; name=\"file\""),
        );
        headers.append("x-custom-id", HeaderValue::from_static("1"));
        headers.append("x-custom-id", HeaderValue::from_static("2"));

        let mut buf = BytesMut::new();
        write_header_map(&mut buf, &headers);

        assert_eq!(
            &buf[..],
            &b"Content-Disposition: form-data; name=\"file\"\r\n\
               Content-Type: image/png\r\n\
               X-Custom-Id: 1\r\n\
               X-Custom-Id: 2\r\n"[..]
        );
    }

    #[test]
    fn test_header_value() {
        assert_eq!(header_value(Bytes::from_static(b"text/plain")).unwrap(), "text/plain");
        assert!(header_value(Bytes::from_static(b"bad\nvalue")).is_err());
    }
}
