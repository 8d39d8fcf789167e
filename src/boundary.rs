use crate::constants;
use rand::Rng;

/// Generates a random boundary made of four 64-bit hex groups.
pub(crate) fn generate() -> String {
    let mut rng = rand::thread_rng();

    let a: u64 = rng.gen();
    let b: u64 = rng.gen();
    let c: u64 = rng.gen();
    let d: u64 = rng.gen();

    format!("{:016x}-{:016x}-{:016x}-{:016x}", a, b, c, d)
}

/// Checks the boundary against the RFC 2046 `boundary` grammar: 1 to 70
/// `bchars`, the last of which must not be a space.
pub(crate) fn validate(boundary: &str) -> crate::Result<()> {
    let valid = !boundary.is_empty()
        && boundary.len() <= constants::MAX_BOUNDARY_LEN
        && boundary.bytes().all(is_bchar)
        && !boundary.ends_with(' ');

    if valid {
        Ok(())
    } else {
        Err(crate::Error::InvalidBoundary {
            boundary: boundary.to_owned(),
        })
    }
}

/// Builds the `Content-Type` value for the enclosing request.
pub(crate) fn form_data_content_type(boundary: &str) -> String {
    if boundary.bytes().any(is_tspecial) {
        format!("{}; boundary=\"{}\"", constants::MULTIPART_FORM_DATA, boundary)
    } else {
        format!("{}; boundary={}", constants::MULTIPART_FORM_DATA, boundary)
    }
}

fn is_bchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?' | b' '
        )
}

// RFC 2045 tspecials plus space; any of these forces a quoted parameter value.
fn is_tspecial(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'=' | b' '
    )
}
