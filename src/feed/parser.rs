use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use serde::Serialize;
use thiserror::Error;

use super::description::DescriptionHtml;

pub const NO_TITLE: &str = "No Title";
pub const NO_DESCRIPTION: &str = "No Description";
pub const NO_LINK: &str = "#";
pub const NO_DATE: &str = "No Date";
pub const NO_SOURCE: &str = "No source";

/// Default display format for publication dates, e.g. "January 15, 2024".
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

#[derive(Debug, Error)]
#[error("Feed could not be parsed: {0}")]
pub struct ParseError(#[from] parser::ParseFeedError);

/// One feed item, normalized for display.
///
/// Title, source, link and categories hold raw feed text; the two description
/// fields are already HTML. Missing fields carry their placeholder values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItemRecord {
    pub title: String,
    pub full_description_html: String,
    pub truncated_description_html: String,
    pub pub_date: String,
    pub source: String,
    pub link: String,
    pub categories: Vec<String>,
}

/// Parse feed bytes into display records, preserving document order.
///
/// Dates are rendered in UTC using the chrono `date_format`.
pub fn parse_feed(bytes: &[u8], date_format: &str) -> Result<Vec<FeedItemRecord>, ParseError> {
    let feed = parser::parse(bytes)?;

    let records = feed
        .entries
        .into_iter()
        .map(|entry| to_record(entry, date_format))
        .collect();

    Ok(records)
}

fn to_record(entry: Entry, date_format: &str) -> FeedItemRecord {
    let title =
        non_blank(entry.title.map(|t| t.content)).unwrap_or_else(|| NO_TITLE.to_string());
    let description = non_blank(entry.summary.map(|s| s.content))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let link = non_blank(entry.links.into_iter().next().map(|l| l.href));

    // Only the first category element is read; it carries a comma-separated list
    let categories = entry
        .categories
        .first()
        .map(|c| split_categories(&c.term))
        .unwrap_or_default();

    let DescriptionHtml { full, truncated } = DescriptionHtml::from_text(&description);

    FeedItemRecord {
        title,
        full_description_html: full,
        truncated_description_html: truncated,
        pub_date: format_date(entry.published, date_format),
        source: link.clone().unwrap_or_else(|| NO_SOURCE.to_string()),
        link: link.unwrap_or_else(|| NO_LINK.to_string()),
        categories,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Split a comma-separated category list, trimming entries and dropping empties.
pub fn split_categories(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a publication date for display, or the placeholder when absent.
pub fn format_date(published: Option<DateTime<Utc>>, date_format: &str) -> String {
    match published {
        Some(dt) => dt.format(date_format).to_string(),
        None => NO_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn rss(items: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Test</title>{items}</channel></rss>"#
        )
    }

    fn parse(items: &str) -> Vec<FeedItemRecord> {
        parse_feed(rss(items).as_bytes(), DEFAULT_DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_complete_item() {
        let records = parse(
            r#"<item>
                <title>Hello</title>
                <description>First line
Second line</description>
                <link>https://example.com/hello</link>
                <category>Rust, Web ,, Feeds</category>
                <pubDate>Mon, 15 Jan 2024 10:00:00 GMT</pubDate>
            </item>"#,
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Hello");
        assert_eq!(
            record.full_description_html,
            "<p>First line</p><p>Second line</p>"
        );
        assert_eq!(record.truncated_description_html, "<p>First line...</p>");
        assert_eq!(record.link, "https://example.com/hello");
        assert_eq!(record.source, "https://example.com/hello");
        assert_eq!(record.categories, vec!["Rust", "Web", "Feeds"]);
        assert_eq!(record.pub_date, "January 15, 2024");
    }

    #[test]
    fn test_empty_item_uses_placeholders() {
        let records = parse("<item></item>");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, NO_TITLE);
        assert_eq!(record.full_description_html, "<p>No Description</p>");
        assert_eq!(record.truncated_description_html, "<p>No Description</p>");
        assert_eq!(record.link, NO_LINK);
        assert_eq!(record.source, NO_SOURCE);
        assert_eq!(record.pub_date, NO_DATE);
        assert!(record.categories.is_empty());
    }

    #[test]
    fn test_unparseable_date_uses_placeholder() {
        let records = parse("<item><title>T</title><pubDate>not a date</pubDate></item>");
        assert_eq!(records[0].pub_date, NO_DATE);
    }

    #[test]
    fn test_only_first_category_element_is_read() {
        let records = parse(
            "<item><title>T</title><category>a, b</category><category>c</category></item>",
        );
        assert_eq!(records[0].categories, vec!["a", "b"]);
    }

    #[test]
    fn test_items_keep_document_order() {
        let records = parse(
            "<item><title>One</title></item><item><title>Two</title></item><item><title>Three</title></item>",
        );
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_empty_channel_has_no_records() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let result = parse_feed(b"<not valid xml", DEFAULT_DATE_FORMAT);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("could not be parsed"));
    }

    #[test]
    fn test_format_date_with_custom_format() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap();
        assert_eq!(format_date(Some(dt), "%Y-%m-%d"), "2024-03-05");
        assert_eq!(format_date(Some(dt), DEFAULT_DATE_FORMAT), "March 5, 2024");
        assert_eq!(format_date(None, "%Y-%m-%d"), NO_DATE);
    }

    #[test]
    fn test_split_categories_edge_cases() {
        assert!(split_categories("").is_empty());
        assert!(split_categories(" , ,").is_empty());
        assert_eq!(split_categories("single"), vec!["single"]);
    }
}
