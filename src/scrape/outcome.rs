use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;

use crate::entities::{ErrorCategory, Outcome};
use crate::scrape::text_containing;

const SUCCESS_MARKER: &str = "Song Reuploaded:";
// upstream spelling
const ERROR_MARKER: &str = "An error has occured:";

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static SONG_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"Song Reuploaded: (\d+)").unwrap());

/// Classify the page the dashboard renders after a reupload submission.
///
/// Matching is purely textual; if upstream rewords its template every result
/// degrades to [`ErrorCategory::Unknown`].
pub fn classify(html: &str) -> Outcome {
    let document = Html::parse_document(html);

    if let Some(text) = text_containing(&document, &PARAGRAPH, SUCCESS_MARKER) {
        if let Some(captures) = SONG_ID.captures(&text) {
            return Outcome::success(&captures[1]);
        }
        // a marker without an id does not count as success
        warn!(marker = %text.trim(), "success marker without a song id");
    }

    let Some(text) = text_containing(&document, &PARAGRAPH, ERROR_MARKER) else {
        // also what an expired session looks like
        warn!("no outcome marker in response page");
        return Outcome::error(ErrorCategory::Unknown);
    };

    let category = if text.contains("-3") {
        ErrorCategory::Duplicate
    } else if text.contains("-2") {
        ErrorCategory::InvalidSource
    } else {
        ErrorCategory::Unknown
    };
    Outcome::error(category)
}


#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_classify_never_panics(html in ".*") {
            let _ = classify(&html);
        }

        #[test]
        fn test_song_id_round_trips(id in "[0-9]{1,9}") {
            let html = format!("<p>Song Reuploaded: {id}</p>");
            prop_assert_eq!(classify(&html), Outcome::success(id));
        }
    }
}
