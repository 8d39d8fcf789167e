pub(crate) const BOUNDARY_EXT: &str = "--";
pub(crate) const CRLF: &str = "\r\n";
pub(crate) const HEADER_SEP: &str = ": ";

/// RFC 2046 limits a boundary to 70 characters.
pub(crate) const MAX_BOUNDARY_LEN: usize = 70;

/// Number of leading bytes inspected when sniffing the content type.
pub(crate) const SNIFF_LEN: usize = 512;

pub(crate) const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub(crate) const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
