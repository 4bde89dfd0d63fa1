//! Paginated feed widget.
//!
//! A [`FeedWidget`] owns everything one embedded feed needs: the loaded
//! records and page position ([`FeedState`]), the per-item toggle state of the
//! current page, and the click handlers it has registered. It writes into two
//! containers of a shared [`Document`] and touches nothing else, so several
//! widgets can live on one page independently.
//!
//! # Module Structure
//!
//! - `paginator` - Page count, slicing, and bounded navigation
//! - `dom` - Retained element tree and target containers
//! - `events` - Handler registration keyed by element identity
//! - `render` - Feed item elements and the description toggle
//! - `controls` - Previous/next/numbered page buttons

pub mod controls;
pub mod dom;
pub mod events;
pub mod paginator;
pub mod render;

use std::num::NonZeroUsize;

use crate::config::Config;
use crate::feed::{self, FeedItemRecord, FetchError};

pub use dom::{Document, DomError, Element, ElementId};
pub use events::{Action, HandlerRegistry, Scope};
pub use paginator::{FeedState, PageError, Paginator};
pub use render::{DescriptionState, ItemView};

pub const DEFAULT_ITEMS_PER_PAGE: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// Message shown in the display container when the feed cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading feed.";

/// Widget initialization options.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub display_target_id: String,
    pub controls_target_id: String,
    pub feed_url: String,
    pub items_per_page: NonZeroUsize,
    pub date_format: String,
}

impl WidgetOptions {
    /// Options with the default page size of 5.
    pub fn new(display_target_id: &str, controls_target_id: &str, feed_url: &str) -> Self {
        Self {
            display_target_id: display_target_id.to_string(),
            controls_target_id: controls_target_id.to_string(),
            feed_url: feed_url.to_string(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            date_format: feed::DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn items_per_page(mut self, items_per_page: NonZeroUsize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    /// Options taking targets, page size and date format from `config`.
    pub fn from_config(config: &Config, feed_url: &str) -> Self {
        Self::new(
            &config.display_target_id,
            &config.controls_target_id,
            feed_url,
        )
        .items_per_page(config.page_size())
        .date_format(&config.date_format)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed,
}

/// Fetch the feed and render its first page.
///
/// Failures never escape: they are logged and the display container shows
/// [`LOAD_ERROR_MESSAGE`] instead. Inspect [`FeedWidget::status`] to tell the
/// outcomes apart.
pub async fn init_feed(
    doc: &mut Document,
    client: &reqwest::Client,
    config: &Config,
    options: WidgetOptions,
) -> FeedWidget {
    let mut widget = FeedWidget::new(options);
    let body = feed::fetch_feed(
        client,
        &widget.options.feed_url,
        std::time::Duration::from_secs(config.request_timeout_secs),
        config.max_feed_bytes,
    )
    .await;
    widget.complete_load(doc, body);
    widget
}

#[derive(Debug)]
pub struct FeedWidget {
    options: WidgetOptions,
    state: FeedState,
    items: Vec<ItemView>,
    handlers: HandlerRegistry,
    status: LoadStatus,
}

impl FeedWidget {
    pub fn new(options: WidgetOptions) -> Self {
        let state = FeedState::new(options.items_per_page);
        Self {
            options,
            state,
            items: Vec::new(),
            handlers: HandlerRegistry::new(),
            status: LoadStatus::Pending,
        }
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Views of the items currently on display, in page order.
    pub fn item_views(&self) -> &[ItemView] {
        &self.items
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Finish loading with the outcome of the fetch.
    ///
    /// On success the body is parsed, the state populated, and page 1 drawn
    /// with its controls. On any failure the display container is replaced by
    /// the error message and the controls container is left as it was.
    pub fn complete_load(&mut self, doc: &mut Document, body: Result<Vec<u8>, FetchError>) {
        if self.status != LoadStatus::Pending {
            tracing::warn!(feed = %self.options.feed_url, "Feed already loaded, ignoring");
            return;
        }

        let records = body.and_then(|bytes| {
            feed::parse_feed(&bytes, &self.options.date_format).map_err(FetchError::from)
        });

        match records {
            Ok(records) => self.load_records(doc, records),
            Err(e) => {
                tracing::error!(
                    feed = %self.options.feed_url,
                    error = %e,
                    "Error fetching RSS feed"
                );
                self.show_error(doc);
            }
        }
    }

    /// Populate the widget from already-parsed records.
    pub fn load_records(&mut self, doc: &mut Document, records: Vec<FeedItemRecord>) {
        if let Err(e) = self.state.populate(records) {
            tracing::warn!(feed = %self.options.feed_url, error = %e, "Ignoring second load");
            return;
        }
        self.status = LoadStatus::Loaded;
        tracing::info!(
            feed = %self.options.feed_url,
            items = self.state.items().len(),
            pages = self.state.total_pages(),
            "Feed loaded"
        );
        self.render_all(doc);
    }

    /// Handle a click on `element`.
    ///
    /// Returns `false` when no handler is registered for it, including ids
    /// from a render that has since been replaced.
    pub fn activate(&mut self, doc: &mut Document, element: ElementId) -> bool {
        let Some(action) = self.handlers.get(element) else {
            return false;
        };

        match action {
            Action::ToggleDescription(slot) => self.toggle(doc, slot),
            Action::PreviousPage => {
                if self.state.previous() {
                    self.render_all(doc);
                }
            }
            Action::NextPage => {
                if self.state.next() {
                    self.render_all(doc);
                }
            }
            Action::GoToPage(page) => {
                if let Err(e) = self.go_to_page(doc, page) {
                    tracing::debug!(error = %e, "Page button ignored");
                }
            }
        }
        true
    }

    /// Navigate to `page` and redraw both containers.
    pub fn go_to_page(&mut self, doc: &mut Document, page: usize) -> Result<(), PageError> {
        self.state.go_to(page)?;
        self.render_all(doc);
        Ok(())
    }

    fn toggle(&mut self, doc: &mut Document, slot: usize) {
        let Some(view) = self.items.get_mut(slot) else {
            return;
        };
        let Some(record) = self.state.items().get(view.record) else {
            return;
        };
        if !render::toggle_description(doc, view, record) {
            tracing::debug!(slot, "Toggled item is no longer in the document");
        }
    }

    fn render_all(&mut self, doc: &mut Document) {
        self.render_page(doc);
        self.render_controls(doc);
    }

    fn render_page(&mut self, doc: &mut Document) {
        self.handlers.clear(Scope::Display);
        self.items.clear();

        let rendered = render::render_page(
            doc,
            self.state.current_items(),
            self.state.current_offset(),
        );
        let mut elements = Vec::with_capacity(rendered.len());
        for (slot, item) in rendered.into_iter().enumerate() {
            self.handlers.register(
                Scope::Display,
                item.view.toggle,
                Action::ToggleDescription(slot),
            );
            self.items.push(item.view);
            elements.push(item.element);
        }

        tracing::debug!(
            page = self.state.current_page(),
            items = elements.len(),
            "Rendering feed page"
        );
        if let Err(e) = doc.replace_children(&self.options.display_target_id, elements) {
            tracing::warn!(error = %e, "Display target missing, items not rendered");
            self.handlers.clear(Scope::Display);
            self.items.clear();
        }
    }

    fn render_controls(&mut self, doc: &mut Document) {
        self.handlers.clear(Scope::Controls);

        let controls =
            controls::build_controls(doc, self.state.current_page(), self.state.total_pages());
        let mut elements = Vec::with_capacity(controls.len());
        for (element, action) in controls {
            self.handlers.register(Scope::Controls, element.id(), action);
            elements.push(element);
        }

        if let Err(e) = doc.replace_children(&self.options.controls_target_id, elements) {
            tracing::warn!(error = %e, "Controls target missing, pagination not rendered");
            self.handlers.clear(Scope::Controls);
        }
    }

    fn show_error(&mut self, doc: &mut Document) {
        self.status = LoadStatus::Failed;
        self.handlers.clear(Scope::Display);
        self.items.clear();

        let message = doc.create_element("p").with_text(LOAD_ERROR_MESSAGE);
        if let Err(e) = doc.replace_children(&self.options.display_target_id, vec![message]) {
            tracing::warn!(error = %e, "Display target missing, error message not shown");
        }
    }
}
