//! Minimal HTML tree with a pretty-printing serializer
//!
//! Pages are assembled as a tree of [`Node`]s and serialized once, so every
//! opened element is closed by construction. Text and attribute values are
//! escaped on output; [`Node::Raw`] is written verbatim (stylesheets, scripts).

use htmlescape::encode_minimal;

/// Elements written without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "link", "meta"];

/// Indentation per nesting level
const INDENT: &str = " ";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn raw(markup: impl Into<String>) -> Self {
        Node::Raw(markup.into())
    }

    /// Serialize with one element or text run per line
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        match self {
            Node::Text(text) => {
                out.push_str(&indent);
                out.push_str(&encode_minimal(text));
                out.push('\n');
            }
            Node::Raw(markup) => {
                for line in markup.lines() {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Node::Element(element) => element.write_pretty(out, depth, &indent),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0, "");
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize, indent: &str) {
        out.push_str(indent);
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&encode_minimal(value));
            out.push('"');
        }
        out.push_str(">\n");

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_pretty(out, depth + 1);
        }

        out.push_str(indent);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push_str(">\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_nesting() {
        let list = Element::new("ul")
            .class("items")
            .child(Element::new("li").text("one"))
            .child(Element::new("li").text("two"));

        assert_eq!(
            list.to_pretty_string(),
            "<ul class=\"items\">\n <li>\n  one\n </li>\n <li>\n  two\n </li>\n</ul>\n"
        );
    }

    #[test]
    fn test_text_and_attributes_escaped() {
        let link = Element::new("a")
            .attr("href", "https://example.org/?a=1&b=<2>")
            .text("Tom & Jerry <3");

        let html = link.to_pretty_string();
        assert!(html.contains("href=\"https://example.org/?a=1&amp;b=&lt;2&gt;\""));
        assert!(html.contains("Tom &amp; Jerry &lt;3"));
    }

    #[test]
    fn test_raw_is_verbatim() {
        let style = Element::new("style").child(Node::raw(".a > .b { color: red; }"));
        assert_eq!(
            style.to_pretty_string(),
            "<style>\n.a > .b { color: red; }\n</style>\n"
        );
    }

    #[test]
    fn test_void_element() {
        let head = Element::new("head").child(Element::new("meta").attr("charset", "utf-8"));
        assert_eq!(
            head.to_pretty_string(),
            "<head>\n <meta charset=\"utf-8\">\n</head>\n"
        );
    }

    #[test]
    fn test_builder_accessors() {
        let mut div = Element::new("div").id("x");
        div.push(Node::text("a"));
        assert_eq!(div.tag(), "div");
        assert_eq!(div.get_attr("id"), Some("x"));
        assert_eq!(div.child_nodes().len(), 1);
    }
}
