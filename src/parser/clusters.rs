use super::nodes::{MarkupNode, NodeKind};

/// The nodes belonging to one candidate book, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCluster {
    pub nodes: Vec<MarkupNode>,
}

impl BookCluster {
    /// `href` of the first anchor in the cluster; an empty href counts as none.
    pub fn detail_link(&self) -> Option<&str> {
        self.nodes
            .iter()
            .find_map(|n| match &n.kind {
                NodeKind::Anchor { href } => Some(href.as_deref()),
                _ => None,
            })
            .flatten()
            .filter(|href| !href.is_empty())
    }
}

/// Split a flat node list into one cluster per heading.
///
/// A heading closes the open cluster (if it holds anything) and starts a new
/// one. Nodes before the first heading stay in the first cluster.
pub fn cluster_books(nodes: &[MarkupNode]) -> Vec<BookCluster> {
    let mut clusters = Vec::new();
    let mut current: Vec<MarkupNode> = Vec::new();

    for node in nodes {
        if node.is_heading() && !current.is_empty() {
            clusters.push(BookCluster {
                nodes: std::mem::take(&mut current),
            });
        }
        current.push(node.clone());
    }

    if !current.is_empty() {
        clusters.push(BookCluster { nodes: current });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::nodes::{parse_selector, Page};
    use proptest::prelude::*;

    fn h(t: &str) -> MarkupNode {
        MarkupNode::new(NodeKind::Heading, t)
    }

    fn p(t: &str) -> MarkupNode {
        MarkupNode::new(NodeKind::Paragraph, t)
    }

    fn a(href: Option<&str>) -> MarkupNode {
        MarkupNode::new(
            NodeKind::Anchor {
                href: href.map(str::to_string),
            },
            "link",
        )
    }

    #[test]
    fn one_cluster_per_heading() {
        let nodes = vec![h("A"), p("a1"), p("a2"), h("B"), p("b1")];
        let clusters = cluster_books(&nodes);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].nodes.len(), 3);
        assert_eq!(clusters[1].nodes, vec![h("B"), p("b1")]);
    }

    #[test]
    fn leading_nodes_open_the_first_cluster() {
        let nodes = vec![p("intro"), h("A"), p("a1")];
        let clusters = cluster_books(&nodes);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].nodes, vec![p("intro")]);
        assert_eq!(clusters[1].nodes[0], h("A"));
    }

    #[test]
    fn trailing_cluster_is_flushed() {
        let clusters = cluster_books(&[h("only")]);
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn empty_input() {
        assert!(cluster_books(&[]).is_empty());
    }

    #[test]
    fn consecutive_headings() {
        let clusters = cluster_books(&[h("A"), h("B")]);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn detail_link_is_first_anchor() {
        let c = BookCluster {
            nodes: vec![h("A"), a(Some("one.html")), a(Some("two.html"))],
        };
        assert_eq!(c.detail_link(), Some("one.html"));
    }

    #[test]
    fn empty_first_anchor_means_no_link() {
        let c = BookCluster {
            nodes: vec![h("A"), a(Some("")), a(Some("two.html"))],
        };
        assert_eq!(c.detail_link(), None);
        let c = BookCluster {
            nodes: vec![h("A"), a(None), a(Some("two.html"))],
        };
        assert_eq!(c.detail_link(), None);
    }

    #[test]
    fn index_fixture_clusters() {
        let html = std::fs::read_to_string("tests/fixtures/index.html").unwrap();
        let page = Page::from_html(&html, &parse_selector("article").unwrap());
        let clusters = cluster_books(&page.nodes);
        let sizes: Vec<_> = clusters.iter().map(|c| c.nodes.len()).collect();
        assert_eq!(sizes, vec![8, 7, 3]);
        assert_eq!(clusters[0].detail_link(), Some("book1.html"));
        assert_eq!(clusters[1].detail_link(), Some("book2.html"));
        assert_eq!(clusters[2].detail_link(), None);
    }

    fn node_strategy() -> impl Strategy<Value = MarkupNode> {
        prop_oneof![
            Just(h("heading")),
            Just(p("para")),
            Just(MarkupNode::new(NodeKind::Division, "en")),
            Just(MarkupNode::new(NodeKind::Other, "img")),
        ]
    }

    proptest! {
        #[test]
        fn cluster_count_matches_headings(nodes in prop::collection::vec(node_strategy(), 0..40)) {
            let clusters = cluster_books(&nodes);
            let headings = nodes.iter().filter(|n| n.is_heading()).count();
            let leading = nodes.first().is_some_and(|n| !n.is_heading());
            prop_assert_eq!(clusters.len(), headings + usize::from(leading));

            let total: usize = clusters.iter().map(|c| c.nodes.len()).sum();
            prop_assert_eq!(total, nodes.len());
            prop_assert!(clusters.iter().all(|c| !c.nodes.is_empty()));
        }
    }
}
