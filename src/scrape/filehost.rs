use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static UPLOAD_FORMS: Lazy<[Selector; 2]> = Lazy::new(|| {
    [
        Selector::parse(r#"form[enctype="multipart/form-data"][action]"#).unwrap(),
        Selector::parse("form[action]").unwrap(),
    ]
});

// The same element carries the link on the upload result page and on the
// intermediate share page.
static SHARE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.share-link[href], input.share-link[value]").unwrap());

/// Find where the file host currently wants uploads posted. The landing page
/// form changes its target over time, so this is read fresh for every job.
///
/// Relative actions are resolved against `page_url`.
pub fn extract_upload_target(html: &str, page_url: &Url) -> Option<Url> {
    let document = Html::parse_document(html);

    UPLOAD_FORMS.iter().find_map(|selector| {
        document
            .select(selector)
            .filter_map(|form| form.value().attr("action"))
            .map(str::trim)
            .find(|action| !action.is_empty())
            .and_then(|action| page_url.join(action).ok())
    })
}

/// Pull the share link out of a file host page. The value may be a fragment
/// (path or relative URL); building the absolute URL is up to the caller.
pub fn extract_share_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&SHARE_LINK)
        .filter_map(|element| {
            let value = element.value();
            value.attr("href").or_else(|| value.attr("value"))
        })
        .map(str::trim)
        .find(|link| !link.is_empty())
        .map(str::to_string)
}


#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_scrapers_never_panic(html in ".*") {
            let _ = extract_share_link(&html);
            let _ = extract_upload_target(&html, &Url::parse("https://files.test/").unwrap());
        }
    }
}
