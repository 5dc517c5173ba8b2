//! Element locators
//!
//! A [`Locator`] is an immutable (strategy, value) pair. Static locators are
//! `const` items on the page and component types; parameterised ones are built
//! by small functions that quote their arguments with [`xpath_literal`].

use std::borrow::Cow;
use std::fmt;

/// Lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum By {
    Id,
    Css,
    XPath,
    ClassName,
    Name,
    TagName,
    LinkText,
}

impl By {
    /// Short name used in log lines and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            By::Id => "id",
            By::Css => "css",
            By::XPath => "xpath",
            By::ClassName => "class",
            By::Name => "name",
            By::TagName => "tag",
            By::LinkText => "link",
        }
    }
}

/// Immutable (strategy, value) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    by: By,
    value: Cow<'static, str>,
}

impl Locator {
    /// Create a locator from a static value
    pub const fn new(by: By, value: &'static str) -> Self {
        Self {
            by,
            value: Cow::Borrowed(value),
        }
    }

    /// Create a locator from a value computed at runtime
    pub fn dynamic<S: Into<String>>(by: By, value: S) -> Self {
        Self {
            by,
            value: Cow::Owned(value.into()),
        }
    }

    pub const fn id(value: &'static str) -> Self {
        Self::new(By::Id, value)
    }

    pub const fn css(value: &'static str) -> Self {
        Self::new(By::Css, value)
    }

    pub const fn xpath(value: &'static str) -> Self {
        Self::new(By::XPath, value)
    }

    pub const fn class_name(value: &'static str) -> Self {
        Self::new(By::ClassName, value)
    }

    pub const fn name(value: &'static str) -> Self {
        Self::new(By::Name, value)
    }

    pub const fn tag_name(value: &'static str) -> Self {
        Self::new(By::TagName, value)
    }

    pub const fn link_text(value: &'static str) -> Self {
        Self::new(By::LinkText, value)
    }

    pub fn by(&self) -> By {
        self.by
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.by.as_str(), self.value)
    }
}

/// Quote `text` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so text holding both quote kinds is split
/// into a `concat(...)` call.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }

    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_strategy() {
        assert_eq!(Locator::id("subscribe").to_string(), "id=subscribe");
        assert_eq!(
            Locator::css("a[href='/login']").to_string(),
            "css=a[href='/login']"
        );
    }

    #[test]
    fn test_static_and_dynamic_locators_compare_equal() {
        const STATIC: Locator = Locator::xpath("//b[normalize-space()='Test Cases']");
        let dynamic = Locator::dynamic(By::XPath, "//b[normalize-space()='Test Cases']".to_string());
        assert_eq!(STATIC, dynamic);
    }

    #[test]
    fn test_xpath_literal_plain_text() {
        assert_eq!(xpath_literal("Blue Top"), "'Blue Top'");
    }

    #[test]
    fn test_xpath_literal_with_apostrophe() {
        assert_eq!(xpath_literal("Men's Tshirt"), "\"Men's Tshirt\"");
    }

    #[test]
    fn test_xpath_literal_with_both_quotes() {
        assert_eq!(
            xpath_literal("a'b\"c"),
            "concat('a', \"'\", 'b\"c')"
        );
    }
}
