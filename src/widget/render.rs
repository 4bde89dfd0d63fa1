//! Item rendering and the per-item expand/collapse toggle.

use crate::feed::FeedItemRecord;

use super::dom::{Document, Element, ElementId};

pub const READ_MORE_LABEL: &str = "Read full article";
pub const CLOSE_LABEL: &str = "Close";
pub const SOURCE_LABEL: &str = "Source: ";

/// Display state of one item's description region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionState {
    Collapsed,
    Expanded,
}

impl DescriptionState {
    pub fn toggle_label(self) -> &'static str {
        match self {
            DescriptionState::Collapsed => READ_MORE_LABEL,
            DescriptionState::Expanded => CLOSE_LABEL,
        }
    }
}

/// Handles into one rendered item, plus its toggle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    /// Index of the record in the full item sequence.
    pub record: usize,
    pub item: ElementId,
    pub region: ElementId,
    pub content: ElementId,
    pub toggle: ElementId,
    pub state: DescriptionState,
}

pub struct RenderedItem {
    pub element: Element,
    pub view: ItemView,
}

pub fn facebook_share_url(link: &str) -> String {
    format!(
        "https://www.facebook.com/sharer/sharer.php?u={}",
        urlencoding::encode(link)
    )
}

pub fn twitter_share_url(link: &str, title: &str) -> String {
    format!(
        "https://twitter.com/intent/tweet?url={}&text={}",
        urlencoding::encode(link),
        urlencoding::encode(title)
    )
}

/// Build the elements for one page of records.
///
/// `offset` is the index of `records[0]` in the full sequence. Every item
/// starts collapsed.
pub fn render_page(
    doc: &mut Document,
    records: &[FeedItemRecord],
    offset: usize,
) -> Vec<RenderedItem> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| render_item(doc, record, offset + i))
        .collect()
}

/// Build one `div.feed-item`.
pub fn render_item(doc: &mut Document, record: &FeedItemRecord, index: usize) -> RenderedItem {
    let tags: Vec<Element> = record
        .categories
        .iter()
        .map(|cat| doc.create_element("div").with_class("tag").with_text(cat.as_str()))
        .collect();
    let tags = doc.create_element("div").with_class("tags").with_children(tags);

    let title = doc.create_element("h2").with_text(record.title.as_str());

    let date = doc
        .create_element("div")
        .with_class("date")
        .with_text(record.pub_date.as_str());
    let share = share_icons(doc, record);
    let date_share = doc
        .create_element("div")
        .with_class("date-share")
        .with_child(date)
        .with_child(share);

    let separator = doc.create_element("hr").with_class("separator");

    let content = doc
        .create_element("div")
        .with_class("description-content")
        .with_html(record.truncated_description_html.as_str());
    let content_id = content.id();
    let region = doc
        .create_element("div")
        .with_class("description")
        .with_child(content);
    let region_id = region.id();

    let source_label = doc
        .create_element("span")
        .with_class("source-label")
        .with_text(SOURCE_LABEL);
    let source_content = doc
        .create_element("span")
        .with_class("source-content")
        .with_text(record.source.as_str());
    let source = doc
        .create_element("div")
        .with_class("source")
        .with_child(source_label)
        .with_child(source_content);

    let toggle = doc
        .create_element("button")
        .with_class("toggle-description")
        .with_text(READ_MORE_LABEL);
    let toggle_id = toggle.id();
    let buttons = doc
        .create_element("div")
        .with_class("button-container")
        .with_child(toggle);

    let item = doc
        .create_element("div")
        .with_class("feed-item")
        .with_child(tags)
        .with_child(title)
        .with_child(date_share)
        .with_child(separator)
        .with_child(region)
        .with_child(source)
        .with_child(buttons);

    let view = ItemView {
        record: index,
        item: item.id(),
        region: region_id,
        content: content_id,
        toggle: toggle_id,
        state: DescriptionState::Collapsed,
    };

    RenderedItem {
        element: item,
        view,
    }
}

fn share_icons(doc: &mut Document, record: &FeedItemRecord) -> Element {
    let fb_icon = doc
        .create_element("i")
        .with_class("fab")
        .with_class("fa-facebook-f");
    let facebook = doc
        .create_element("a")
        .with_class("share-icon")
        .with_class("facebook")
        .with_attr("href", facebook_share_url(&record.link))
        .with_attr("target", "_blank")
        .with_attr("title", "Share on Facebook")
        .with_child(fb_icon);

    let x_icon = doc
        .create_element("i")
        .with_class("fab")
        .with_class("fa-twitter");
    let twitter = doc
        .create_element("a")
        .with_class("share-icon")
        .with_class("twitter")
        .with_attr("href", twitter_share_url(&record.link, &record.title))
        .with_attr("target", "_blank")
        .with_attr("title", "Share on X")
        .with_child(x_icon);

    doc.create_element("div")
        .with_class("share-icons")
        .with_child(facebook)
        .with_child(twitter)
}

/// Flip an item between its truncated and full description.
///
/// The height transition is applied immediately: expanding lifts the
/// region's height cap, collapsing restores the default. Returns `false` if
/// the item's elements are no longer in the document.
pub fn toggle_description(
    doc: &mut Document,
    view: &mut ItemView,
    record: &FeedItemRecord,
) -> bool {
    let next = match view.state {
        DescriptionState::Collapsed => DescriptionState::Expanded,
        DescriptionState::Expanded => DescriptionState::Collapsed,
    };
    let html = match next {
        DescriptionState::Expanded => &record.full_description_html,
        DescriptionState::Collapsed => &record.truncated_description_html,
    };

    let Some(content) = doc.find_mut(view.content) else {
        return false;
    };
    content.set_inner_html(html.as_str());

    if let Some(region) = doc.find_mut(view.region) {
        match next {
            DescriptionState::Expanded => region.set_attr("style", "max-height: none"),
            DescriptionState::Collapsed => region.remove_attr("style"),
        }
    }

    if let Some(button) = doc.find_mut(view.toggle) {
        button.set_text(next.toggle_label());
    }

    view.state = next;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> FeedItemRecord {
        FeedItemRecord {
            title: "Fish & <Chips>".to_string(),
            full_description_html: "<p>A</p><p>B</p>".to_string(),
            truncated_description_html: "<p>A...</p>".to_string(),
            pub_date: "January 15, 2024".to_string(),
            source: "https://example.com/a b".to_string(),
            link: "https://example.com/a b".to_string(),
            categories: vec!["Rust".to_string(), "Web".to_string()],
        }
    }

    #[test]
    fn test_item_structure() {
        let mut doc = Document::new();
        let rendered = render_item(&mut doc, &record(), 7);
        let item = &rendered.element;

        assert!(item.has_class("feed-item"));
        let tags: Vec<String> = item
            .find_by_class("tag")
            .iter()
            .map(|t| t.text_content())
            .collect();
        assert_eq!(tags, vec!["Rust", "Web"]);
        assert_eq!(item.first_by_class("date").unwrap().text_content(), "January 15, 2024");
        assert_eq!(
            item.first_by_class("description-content").unwrap().inner_html(),
            "<p>A...</p>"
        );
        assert_eq!(
            item.first_by_class("source-content").unwrap().text_content(),
            "https://example.com/a b"
        );
        assert_eq!(
            item.first_by_class("toggle-description").unwrap().text_content(),
            READ_MORE_LABEL
        );
        assert_eq!(rendered.view.record, 7);
        assert_eq!(rendered.view.state, DescriptionState::Collapsed);
    }

    #[test]
    fn test_feed_text_is_escaped_in_output() {
        let mut doc = Document::new();
        let html = render_item(&mut doc, &record(), 0).element.to_html();
        assert!(html.contains("<h2>Fish &amp; &lt;Chips&gt;</h2>"));
        assert!(!html.contains("<Chips>"));
    }

    #[test]
    fn test_share_links_are_encoded() {
        let mut doc = Document::new();
        let item = render_item(&mut doc, &record(), 0).element;
        let links = item.find_by_class("share-icon");
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0].attr("href"),
            Some("https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Fa%20b")
        );
        assert_eq!(
            links[1].attr("href"),
            Some("https://twitter.com/intent/tweet?url=https%3A%2F%2Fexample.com%2Fa%20b&text=Fish%20%26%20%3CChips%3E")
        );
        assert_eq!(links[1].attr("title"), Some("Share on X"));
        assert_eq!(links[0].attr("target"), Some("_blank"));
    }

    #[test]
    fn test_item_without_categories_has_empty_tags() {
        let mut doc = Document::new();
        let mut rec = record();
        rec.categories.clear();
        let item = render_item(&mut doc, &rec, 0).element;
        assert!(item.find_by_class("tag").is_empty());
        assert_eq!(item.first_by_class("tags").unwrap().inner_html(), "");
    }

    #[test]
    fn test_toggle_twice_restores_collapsed() {
        let mut doc = Document::new();
        doc.add_container("feed");
        let rec = record();
        let RenderedItem { element, mut view } = render_item(&mut doc, &rec, 0);
        doc.replace_children("feed", vec![element]).unwrap();
        let original = doc.container("feed").unwrap().to_html();

        assert!(toggle_description(&mut doc, &mut view, &rec));
        assert_eq!(view.state, DescriptionState::Expanded);
        assert_eq!(doc.find(view.content).unwrap().inner_html(), "<p>A</p><p>B</p>");
        assert_eq!(doc.find(view.toggle).unwrap().text_content(), CLOSE_LABEL);
        assert_eq!(doc.find(view.region).unwrap().attr("style"), Some("max-height: none"));

        assert!(toggle_description(&mut doc, &mut view, &rec));
        assert_eq!(view.state, DescriptionState::Collapsed);
        assert_eq!(doc.container("feed").unwrap().to_html(), original);
    }

    #[test]
    fn test_toggle_detached_item_is_rejected() {
        let mut doc = Document::new();
        let rec = record();
        let RenderedItem { mut view, .. } = render_item(&mut doc, &rec, 0);
        assert!(!toggle_description(&mut doc, &mut view, &rec));
        assert_eq!(view.state, DescriptionState::Collapsed);
    }

    #[test]
    fn test_render_page_offsets_records() {
        let mut doc = Document::new();
        let records = vec![record(), record(), record()];
        let rendered = render_page(&mut doc, &records, 10);
        let indices: Vec<usize> = rendered.iter().map(|r| r.view.record).collect();
        assert_eq!(indices, vec![10, 11, 12]);
    }
}
