use super::clusters::BookCluster;
use super::nodes::NodeKind;
use super::normalize::{flatten_lines, normalize};
use crate::model::BookRecord;

/// Build one record from a cluster and the ISBN resolved for it.
///
/// Heading and division are last-write-wins; paragraphs accumulate into the
/// description. Anchors and other nodes contribute nothing.
pub fn assemble(cluster: &BookCluster, isbn: &str) -> BookRecord {
    let mut title = String::new();
    let mut language = String::new();
    let mut description = String::new();

    for node in &cluster.nodes {
        match &node.kind {
            NodeKind::Heading => title = node.text.trim().to_string(),
            NodeKind::Paragraph => {
                description.push_str(&flatten_lines(&node.text));
                description.push(' ');
            }
            NodeKind::Division => language = node.text.to_uppercase(),
            NodeKind::Anchor { .. } | NodeKind::Other => {}
        }
    }

    BookRecord {
        title,
        description: normalize(&description),
        language,
        isbn: isbn.to_string(),
    }
}
