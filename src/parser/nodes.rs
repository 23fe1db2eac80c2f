use std::sync::LazyLock;

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// Semantic role of an element, decided once at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Heading,
    Paragraph,
    Division,
    Anchor { href: Option<String> },
    Other,
}

impl NodeKind {
    fn from_element(element: &ElementRef) -> Self {
        match element.value().name() {
            "h2" => NodeKind::Heading,
            "p" => NodeKind::Paragraph,
            "div" => NodeKind::Division,
            "a" => NodeKind::Anchor {
                href: element.value().attr("href").map(str::to_string),
            },
            _ => NodeKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    pub kind: NodeKind,
    pub text: String,
}

impl MarkupNode {
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, NodeKind::Heading)
    }
}

/// A fetched document: the container's descendants plus the page's visible text.
#[derive(Debug, Clone)]
pub struct Page {
    pub nodes: Vec<MarkupNode>,
    pub text: String,
}

impl Page {
    /// Parse `html`, walking every descendant element of the first `container`
    /// match in document order. No container means no nodes.
    pub fn from_html(html: &str, container: &Selector) -> Self {
        let document = Html::parse_document(html);

        let nodes = document
            .select(container)
            .next()
            .map(|root| {
                root.descendants()
                    .skip(1)
                    .filter_map(ElementRef::wrap)
                    .map(|el| MarkupNode::new(NodeKind::from_element(&el), el.text().collect::<String>()))
                    .collect()
            })
            .unwrap_or_default();

        let text = match document.select(&BODY_SELECTOR).next() {
            Some(body) => body.text().collect(),
            None => document.root_element().text().collect(),
        };

        Page { nodes, text }
    }
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid container selector {:?}: {}", css, e))
}
