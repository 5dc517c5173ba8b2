//! Scripts the interaction layer runs through `execute_script`
//!
//! Backends receive these verbatim; the mock driver recognises them by
//! identity to emulate their effect.

/// Center `arguments[0]` in the viewport
pub const SCROLL_INTO_VIEW: &str =
    "arguments[0].scrollIntoView({block: 'center', inline: 'center'});";

/// Synthetic hover over `arguments[0]`
pub const HOVER: &str = "\
const el = arguments[0];
for (const type of ['mouseenter', 'mouseover']) {
    el.dispatchEvent(new MouseEvent(type, {bubbles: type === 'mouseover', cancelable: true, view: window}));
}";

pub const SCROLL_TO_TOP: &str = "window.scrollTo(0, 0);";

pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Vertical scroll offset of the window
pub const SCROLL_OFFSET: &str = "return window.pageYOffset;";

/// Serialized DOM of the current document
pub const PAGE_SOURCE: &str = "return document.documentElement.outerHTML;";
