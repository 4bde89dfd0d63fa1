//! Feed loading: HTTP fetch, parsing, and description rendering.
//!
//! - [`fetcher`] - Single-shot HTTP retrieval with timeout and size limit
//! - [`parser`] - RSS/Atom parsing via `feed-rs` into [`FeedItemRecord`]s
//! - [`description`] - Full and truncated paragraph HTML for descriptions
//!
//! # Example
//!
//! ```ignore
//! use feedpage::config::Config;
//! use feedpage::feed::{build_client, load_feed};
//!
//! let config = Config::default();
//! let client = build_client(&config)?;
//! let records = load_feed(&client, "https://example.com/rss.xml", &config).await?;
//! ```

pub mod description;
mod fetcher;
mod parser;

pub use description::DescriptionHtml;
pub use fetcher::{build_client, fetch_feed, load_feed, validate_feed_url, FetchError};
pub use parser::{
    format_date, parse_feed, split_categories, FeedItemRecord, ParseError, DEFAULT_DATE_FORMAT,
    NO_DATE, NO_DESCRIPTION, NO_LINK, NO_SOURCE, NO_TITLE,
};
