#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use multiform::{FormBuilder, NamedReader};

fuzz_target!(|data: &[u8]| {
    // Split the input into a field name, a file name and the file contents.
    let mut pieces = data.splitn(3, |b| *b == 0);
    let field_name = String::from_utf8_lossy(pieces.next().unwrap_or_default()).into_owned();
    let file_name = String::from_utf8_lossy(pieces.next().unwrap_or_default()).into_owned();
    let contents = pieces.next().unwrap_or_default().to_vec();

    let mut form = FormBuilder::with_boundary(Vec::new(), "X-BOUNDARY").expect("boundary");

    let _ = form.add_field(&field_name, &file_name);
    let _ = form.add_file_with_reader(&field_name, &contents[..], &file_name);

    let mut file = NamedReader::new(Cursor::new(contents.clone())).with_name(file_name.clone());
    if form.add_file_with_detected_type(&field_name, &mut file).is_ok() {
        let sniffed = multiform::detect_content_type(&mut file, &file_name).expect("sniff");
        assert!(!sniffed.is_empty());
    }

    let body = form.finish().expect("finish");
    assert!(body.ends_with(b"--X-BOUNDARY--\r\n"));
});
