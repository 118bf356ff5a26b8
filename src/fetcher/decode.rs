use crate::fetcher::types::PageResponse;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

/// How far into the body we look for `<meta>` charset declarations.
const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: [LazyLock<Regex>; 2] = [
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap()),
    LazyLock::new(|| {
        Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
    }),
];

/// Turn a raw HTTP body into a [`PageResponse`] with a UTF-8 rendition of the
/// document. Dashboard pages are frequently served without a charset, so the
/// encoding is sniffed from the header, then `<meta>` tags, then heuristics.
///
/// Bytes that are invalid for the detected encoding become U+FFFD. The page
/// has to be classified even when it is malformed: by the time the dashboard
/// answers a submission the import has already happened.
pub fn decode_page(
    url_final: Url,
    status: StatusCode,
    body: &[u8],
    content_type: &str,
) -> PageResponse {
    let encoding = sniff_encoding(content_type, body);
    let (decoded, _, had_errors) = encoding.decode(body);
    if had_errors {
        warn!(
            url = %url_final,
            encoding = encoding.name(),
            "response body had invalid bytes, decoded lossily"
        );
    }

    PageResponse {
        url_final,
        status,
        body_utf8: decoded.into_owned(),
    }
}

fn sniff_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_from(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let window = &body[..body.len().min(SNIFF_WINDOW)];
    let head = String::from_utf8_lossy(window);
    for regex in &META_CHARSET {
        if let Some(encoding) = label_from(regex, &head) {
            return encoding;
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(window, false);
    detector.guess(None, true)
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
