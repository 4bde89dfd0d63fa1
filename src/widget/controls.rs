//! Pagination controls: `<`, one button per page, `>`.

use super::dom::{Document, Element};
use super::events::Action;

pub const PREVIOUS_LABEL: &str = "<";
pub const NEXT_LABEL: &str = ">";

/// Build the controls for `current_page` of `total_pages`.
///
/// Each button comes with the action it triggers. Previous is marked
/// `disabled` on page 1 and next on the last page (or when there are no
/// pages); the current page's button is marked `active`.
pub fn build_controls(
    doc: &mut Document,
    current_page: usize,
    total_pages: usize,
) -> Vec<(Element, Action)> {
    let mut controls = Vec::with_capacity(total_pages + 2);

    let mut prev = doc.create_element("button").with_text(PREVIOUS_LABEL);
    if current_page <= 1 {
        prev.add_class("disabled");
    }
    controls.push((prev, Action::PreviousPage));

    for page in 1..=total_pages {
        let mut button = doc.create_element("button").with_text(page.to_string());
        if page == current_page {
            button.add_class("active");
        }
        controls.push((button, Action::GoToPage(page)));
    }

    let mut next = doc.create_element("button").with_text(NEXT_LABEL);
    if current_page >= total_pages {
        next.add_class("disabled");
    }
    controls.push((next, Action::NextPage));

    controls
}
