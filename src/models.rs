// Normalized paper and reference shapes
//
// All "is this field present?" decisions about Crossref JSON happen here.
// Blank strings are treated the same as absent fields.

use crate::crossref::{RawAuthor, RawReference, WorkItem};
use serde::Serialize;

/// The paper a search resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperSummary {
    /// DOI; empty when the search hit carried none
    pub id: String,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub venue: Option<String>,
}

impl PaperSummary {
    pub fn from_work(work: &WorkItem) -> Self {
        Self {
            id: non_blank(work.doi.as_deref()).unwrap_or_default(),
            title: first_non_blank(&work.title),
            authors: work.author.iter().filter_map(author_name).collect(),
            year: work.published_print.as_ref().and_then(|d| d.year()),
            venue: first_non_blank(&work.container_title),
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Partial paper record taken from one entry of a bibliography
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceSummary {
    pub id: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub venue: Option<String>,
    /// Kept as text: deposited years look like "2017" but also "2017a"
    pub year: Option<String>,
}

impl ReferenceSummary {
    pub fn from_raw(raw: &RawReference) -> Self {
        Self {
            id: non_blank(raw.doi.as_deref()),
            title: non_blank(raw.article_title.as_deref()).or_else(|| non_blank(raw.title.as_deref())),
            authors: non_blank(raw.author.as_deref()),
            venue: non_blank(raw.journal_title.as_deref())
                .or_else(|| non_blank(raw.container_title.as_deref())),
            year: non_blank(raw.year.as_deref()).or_else(|| {
                raw.published_print
                    .as_ref()
                    .and_then(|d| d.year())
                    .map(|y| y.to_string())
            }),
        }
    }
}

/// One node of the reference tree.
///
/// Top-level references of the searched paper sit at depth 0; a node's
/// children are its own references at `depth + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceNode {
    pub paper: ReferenceSummary,
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ReferenceNode>,
}

impl ReferenceNode {
    pub fn from_raw(raw: &RawReference, depth: usize) -> Self {
        Self {
            paper: ReferenceSummary::from_raw(raw),
            depth,
            children: Vec::new(),
        }
    }

    /// Identifier to expand this node with, if the reference carried one
    pub fn id(&self) -> Option<&str> {
        self.paper.id.as_deref()
    }

    /// Number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ReferenceNode::size).sum::<usize>()
    }

    /// Deepest depth found in this subtree
    pub fn deepest(&self) -> usize {
        self.children
            .iter()
            .map(ReferenceNode::deepest)
            .max()
            .unwrap_or(self.depth)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn first_non_blank(values: &[String]) -> Option<String> {
    values.first().and_then(|v| non_blank(Some(v.as_str())))
}

fn author_name(author: &RawAuthor) -> Option<String> {
    let parts: Vec<&str> = [author.given.as_deref(), author.family.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        non_blank(author.name.as_deref())
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossref::PartialDate;

    fn date(year: i64) -> Option<PartialDate> {
        Some(PartialDate {
            date_parts: vec![vec![Some(year), Some(1)]],
        })
    }

    #[test]
    fn test_paper_from_work() {
        let work = WorkItem {
            doi: Some("10.1/paper".into()),
            title: vec!["Attention Is All You Need".into(), "Subtitle".into()],
            author: vec![
                RawAuthor { given: Some("Ashish".into()), family: Some("Vaswani".into()), name: None },
                RawAuthor { given: None, family: Some("Shazeer".into()), name: None },
                RawAuthor { given: None, family: None, name: Some("Google Brain".into()) },
                RawAuthor::default(),
            ],
            published_print: date(2017),
            container_title: vec!["NeurIPS".into()],
        };

        let paper = PaperSummary::from_work(&work);
        assert_eq!(paper.id, "10.1/paper");
        assert_eq!(paper.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(paper.authors, vec!["Ashish Vaswani", "Shazeer", "Google Brain"]);
        assert_eq!(paper.year, Some(2017));
        assert_eq!(paper.venue.as_deref(), Some("NeurIPS"));
        assert!(paper.has_id());
    }

    #[test]
    fn test_paper_from_empty_work() {
        let paper = PaperSummary::from_work(&WorkItem::default());
        assert_eq!(paper.id, "");
        assert!(!paper.has_id());
        assert_eq!(paper.title, None);
        assert!(paper.authors.is_empty());
        assert_eq!(paper.year, None);
        assert_eq!(paper.venue, None);
    }

    #[test]
    fn test_reference_field_fallbacks() {
        let raw = RawReference {
            doi: Some("  ".into()),
            title: Some("Plain title".into()),
            container_title: Some("Container".into()),
            published_print: date(1999),
            ..Default::default()
        };

        let summary = ReferenceSummary::from_raw(&raw);
        assert_eq!(summary.id, None);
        assert_eq!(summary.title.as_deref(), Some("Plain title"));
        assert_eq!(summary.venue.as_deref(), Some("Container"));
        assert_eq!(summary.year.as_deref(), Some("1999"));
    }

    #[test]
    fn test_reference_prefers_primary_fields() {
        let raw = RawReference {
            doi: Some("10.1/ref".into()),
            article_title: Some("Article".into()),
            title: Some("Other".into()),
            author: Some("Hochreiter".into()),
            journal_title: Some("Neural Computation".into()),
            container_title: Some("Other venue".into()),
            year: Some("1997".into()),
            published_print: date(2000),
        };

        let summary = ReferenceSummary::from_raw(&raw);
        assert_eq!(summary.id.as_deref(), Some("10.1/ref"));
        assert_eq!(summary.title.as_deref(), Some("Article"));
        assert_eq!(summary.authors.as_deref(), Some("Hochreiter"));
        assert_eq!(summary.venue.as_deref(), Some("Neural Computation"));
        assert_eq!(summary.year.as_deref(), Some("1997"));
    }

    #[test]
    fn test_node_size_and_depth() {
        let mut root = ReferenceNode::from_raw(&RawReference::default(), 0);
        let mut child = ReferenceNode::from_raw(&RawReference::default(), 1);
        child.children.push(ReferenceNode::from_raw(&RawReference::default(), 2));
        root.children.push(child);
        root.children.push(ReferenceNode::from_raw(&RawReference::default(), 1));

        assert_eq!(root.size(), 4);
        assert_eq!(root.deepest(), 2);
        assert_eq!(root.id(), None);
    }
}
