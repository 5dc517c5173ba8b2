//! JavaScript generation for the CDP backend
//!
//! Every element operation is evaluated as an expression that first looks the
//! element up by its `data-pom-ref` tag and answers with an envelope:
//! `{"stale": true}` when the tagged node is gone, `{"value": ..}` otherwise.

use crate::error::{Error, Result};
use crate::{By, Locator};
use serde_json::Value;

/// Attribute used to tag elements returned by `find_elements`
pub const REF_ATTRIBUTE: &str = "data-pom-ref";

/// Quote `s` as a JavaScript string literal
pub fn js_string(s: &str) -> String {
    // JSON strings are valid JavaScript literals
    Value::String(s.to_string()).to_string()
}

/// Expression evaluating to the array of elements matching `locator`
pub fn query_all(locator: &Locator) -> String {
    let value = js_string(locator.value());
    match locator.by() {
        By::Id => format!(
            "(() => {{ const el = document.getElementById({}); return el ? [el] : []; }})()",
            value
        ),
        By::Css => format!("Array.from(document.querySelectorAll({}))", value),
        By::ClassName => format!("Array.from(document.getElementsByClassName({}))", value),
        By::Name => format!("Array.from(document.getElementsByName({}))", value),
        By::TagName => format!("Array.from(document.getElementsByTagName({}))", value),
        By::LinkText => format!(
            "Array.from(document.querySelectorAll('a')).filter(a => a.innerText.trim() === {})",
            value
        ),
        By::XPath => format!(
            "(() => {{ \
                const snap = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                const out = []; \
                for (let i = 0; i < snap.snapshotLength; i++) {{ \
                    const node = snap.snapshotItem(i); \
                    if (node.nodeType === Node.ELEMENT_NODE) out.push(node); \
                }} \
                return out; \
            }})()",
            value
        ),
    }
}

/// Expression tagging every match of `locator` and returning the tags.
///
/// Untagged elements get `<prefix><index>`; already tagged ones keep theirs.
pub fn tag_matches(locator: &Locator, prefix: &str) -> String {
    format!(
        "({}).map((el, i) => {{ \
            if (!el.hasAttribute({attr})) el.setAttribute({attr}, {prefix} + i); \
            return el.getAttribute({attr}); \
        }})",
        query_all(locator),
        attr = js_string(REF_ATTRIBUTE),
        prefix = js_string(prefix),
    )
}

/// Expression resolving a tagged element, `null` when it is gone
pub fn lookup(reference: &str) -> String {
    format!(
        "document.querySelector({})",
        js_string(&format!("[{}=\"{}\"]", REF_ATTRIBUTE, reference))
    )
}

/// Run `body` with the tagged element bound to `el`
pub fn on_element(reference: &str, body: &str) -> String {
    format!(
        "(() => {{ \
            const el = {}; \
            if (!el || !el.isConnected) return {{stale: true}}; \
            return {{value: (function(el) {{ {} }})(el)}}; \
        }})()",
        lookup(reference),
        body
    )
}

/// Argument of [`call_script`]: a JSON value or a tagged element
#[derive(Debug, Clone, PartialEq)]
pub enum JsArg {
    Value(Value),
    Element(String),
}

/// Run a function body with `arguments[i]` bound to `args`
pub fn call_script(script: &str, args: &[JsArg]) -> String {
    let mut expressions = Vec::with_capacity(args.len());
    let mut element_slots = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        match arg {
            JsArg::Value(value) => expressions.push(value.to_string()),
            JsArg::Element(reference) => {
                expressions.push(lookup(reference));
                element_slots.push(i.to_string());
            }
        }
    }

    format!(
        "(() => {{ \
            const args = [{}]; \
            for (const i of [{}]) {{ if (!args[i] || !args[i].isConnected) return {{stale: true}}; }} \
            return {{value: (function() {{ {} }}).apply(null, args)}}; \
        }})()",
        expressions.join(", "),
        element_slots.join(", "),
        script
    )
}

/// Unwrap an envelope produced by [`on_element`] or [`call_script`]
pub fn unwrap_envelope(result: Value, reference: &str) -> Result<Value> {
    if result.get("stale").and_then(Value::as_bool).unwrap_or(false) {
        return Err(Error::stale(format!(
            "{} is no longer attached to the document",
            reference
        )));
    }
    Ok(result.get("value").cloned().unwrap_or(Value::Null))
}

/// Element body: visible when it has a box and is not hidden by style
pub const IS_DISPLAYED: &str = "\
const style = window.getComputedStyle(el);
if (style.display === 'none' || style.visibility === 'hidden') return false;
return el.getClientRects().length > 0;";

pub const IS_ENABLED: &str = "return !el.disabled;";

pub const IS_SELECTED: &str = "return !!(el.checked || el.selected);";

pub const TEXT: &str = "return el.innerText !== undefined ? el.innerText : el.textContent;";

/// Element body: scroll into view, then report the click point or the
/// element that would receive the click instead
pub const CLICK_TARGET: &str = "\
el.scrollIntoView({block: 'center', inline: 'center'});
const rect = el.getBoundingClientRect();
const x = rect.left + rect.width / 2;
const y = rect.top + rect.height / 2;
const top = document.elementFromPoint(x, y);
if (top && top !== el && !el.contains(top)) {
    const id = top.id ? '#' + top.id : '';
    const cls = typeof top.className === 'string' && top.className ? '.' + top.className.trim().split(/\\s+/).join('.') : '';
    return {intercepted: top.tagName.toLowerCase() + id + cls};
}
return {x: x, y: y};";

/// Element body: scroll into view and report the centre point
pub const POINTER_TARGET: &str = "\
el.scrollIntoView({block: 'center', inline: 'center'});
const rect = el.getBoundingClientRect();
return {x: rect.left + rect.width / 2, y: rect.top + rect.height / 2};";

pub const FOCUS: &str = "el.focus(); return true;";

pub const CLEAR: &str = "\
el.focus();
if ('value' in el) {
    el.value = '';
    el.dispatchEvent(new Event('input', {bubbles: true}));
    el.dispatchEvent(new Event('change', {bubbles: true}));
}
return true;";

/// Element body reading property `name` when it is a scalar, the attribute
/// otherwise
pub fn attribute(name: &str) -> String {
    format!(
        "const name = {}; \
         const prop = el[name]; \
         if (prop !== undefined && prop !== null && typeof prop !== 'object' && typeof prop !== 'function') return String(prop); \
         return el.getAttribute(name);",
        js_string(name)
    )
}

/// Element body choosing an option of a `<select>` by value
pub fn select_by_value(value: &str) -> String {
    format!(
        "const wanted = {}; \
         const option = Array.from(el.options || []).find(o => o.value === wanted); \
         if (!option) return false; \
         el.value = wanted; \
         el.dispatchEvent(new Event('input', {{bubbles: true}})); \
         el.dispatchEvent(new Event('change', {{bubbles: true}})); \
         return true;",
        js_string(value)
    )
}

pub const READY_STATE: &str = "document.readyState";

pub const LOCATION: &str = "window.location.href";
