#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use reuploader::scrape::{classify, extract_share_link, extract_upload_target};

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let html = String::from_utf8_lossy(data);

    // Upstream pages are untrusted; none of the scrapers may panic
    let _ = classify(&html);
    let _ = extract_share_link(&html);
    let _ = extract_upload_target(&html, &Url::parse("https://files.example.com/").unwrap());
});
