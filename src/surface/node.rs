//! # Injected node artifacts and callback handle types.
//!
//! [`Node`] is the value handed to [`Surface::append_to_head`]
//! (crate::Surface::append_to_head): a script, style, or generic element.
//! No identity is retained after insertion - there is no removal or
//! unregistration capability for injected nodes, and body-event
//! registrations are likewise permanent for the lifetime of the surface.

use std::sync::Arc;

/// Zero-argument continuation invoked after an operation has been applied.
///
/// Uniform across the immediate and deferred branches of `submit`: callers
/// never need to know which branch they hit.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Permanent body-event listener.
///
/// Runs once per matching event for the remaining life of the surface;
/// there is no API to unregister it.
pub type Listener = Arc<dyn Fn() + Send + Sync + 'static>;

/// A head-insertable artifact constructed by the facade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A generic element with tag, attributes and text content.
    Element {
        /// Tag name (e.g. `"meta"`, `"link"`).
        tag: String,
        /// Attribute name/value pairs, in insertion order.
        attrs: Vec<(String, String)>,
        /// Text content.
        text: String,
    },

    /// A script element wrapping raw code verbatim.
    Script {
        /// The raw script source.
        code: String,
    },

    /// A style element wrapping raw CSS verbatim.
    Style {
        /// The raw stylesheet source.
        css: String,
    },
}

impl Node {
    /// Creates a script node wrapping `code` verbatim.
    pub fn script(code: impl Into<String>) -> Self {
        Node::Script { code: code.into() }
    }

    /// Creates a style node wrapping `css` verbatim.
    pub fn style(css: impl Into<String>) -> Self {
        Node::Style { css: css.into() }
    }

    /// Creates a bare element node with the given tag.
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            text: String::new(),
        }
    }

    /// Returns a new element node with an attribute appended.
    ///
    /// No effect on script/style nodes.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.push((name.into(), value.into()));
        }
        self
    }

    /// Returns a new element node with its text content set.
    ///
    /// No effect on script/style nodes.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if let Node::Element { text: t, .. } = &mut self {
            *t = text.into();
        }
        self
    }

    /// Short label for events/logs.
    pub fn label(&self) -> &'static str {
        match self {
            Node::Element { .. } => "element",
            Node::Script { .. } => "script",
            Node::Style { .. } => "style",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_wrap_content_verbatim() {
        let raw = "console.log('a > b && c');";
        assert_eq!(
            Node::script(raw),
            Node::Script {
                code: raw.to_string()
            }
        );
        let css = "body { color: red; }";
        assert_eq!(Node::style(css), Node::Style { css: css.to_string() });
    }

    #[test]
    fn test_element_builder_preserves_attr_order() {
        let node = Node::element("link")
            .with_attr("rel", "stylesheet")
            .with_attr("href", "x.css");
        match node {
            Node::Element { tag, attrs, .. } => {
                assert_eq!(tag, "link");
                assert_eq!(attrs[0].0, "rel");
                assert_eq!(attrs[1].0, "href");
            }
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Node::script("").label(), "script");
        assert_eq!(Node::style("").label(), "style");
        assert_eq!(Node::element("p").label(), "element");
    }
}
