//! Paginated RSS feed widget.
//!
//! Fetches an RSS feed, normalizes its items, and renders them a page at a
//! time into a retained element tree, with per-item toggles between a
//! truncated and a full description.

pub mod config;
pub mod feed;
pub mod widget;
