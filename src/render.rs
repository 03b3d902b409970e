//! Display formatting
//!
//! Pure mapping from finished data to display-ready text. Missing fields are
//! replaced by [`Placeholders`]; a reference without DOI gets no link.

use crate::models::{PaperSummary, ReferenceNode, ReferenceSummary};
use crate::tree::{SearchReport, TreeOutcome};
use serde::Serialize;
use std::fmt;
use termtree::Tree;

pub const DOI_RESOLVER: &str = "https://doi.org/";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholders {
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub year: String,
    pub doi: String,
    pub no_references: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            title: "No title".to_string(),
            authors: "No author information".to_string(),
            venue: "No journal information".to_string(),
            year: "No year information".to_string(),
            doi: "No DOI".to_string(),
            no_references: "No references found.".to_string(),
        }
    }
}

/// Display fields of the searched paper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperDisplay {
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub year: String,
    pub doi: String,
    pub link: Option<String>,
}

/// Display fields of one reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceDisplay {
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub year: String,
    pub doi: Option<String>,
    pub link: Option<String>,
}

pub fn doi_link(doi: &str) -> String {
    format!("{}{}", DOI_RESOLVER, doi)
}

pub fn format_paper(paper: &PaperSummary, placeholders: &Placeholders) -> PaperDisplay {
    let authors = if paper.authors.is_empty() {
        placeholders.authors.clone()
    } else {
        paper.authors.join(", ")
    };

    PaperDisplay {
        title: or_placeholder(paper.title.as_deref(), &placeholders.title),
        authors,
        venue: or_placeholder(paper.venue.as_deref(), &placeholders.venue),
        year: paper
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| placeholders.year.clone()),
        doi: if paper.has_id() {
            paper.id.clone()
        } else {
            placeholders.doi.clone()
        },
        link: paper.has_id().then(|| doi_link(&paper.id)),
    }
}

pub fn format_reference(reference: &ReferenceSummary, placeholders: &Placeholders) -> ReferenceDisplay {
    ReferenceDisplay {
        title: or_placeholder(reference.title.as_deref(), &placeholders.title),
        authors: or_placeholder(reference.authors.as_deref(), &placeholders.authors),
        venue: or_placeholder(reference.venue.as_deref(), &placeholders.venue),
        year: or_placeholder(reference.year.as_deref(), &placeholders.year),
        doi: reference.id.clone(),
        link: reference.id.as_deref().map(doi_link),
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value.unwrap_or(placeholder).to_string()
}

/// Render a report as a header block followed by an indented reference tree
pub fn render_text(report: &SearchReport, placeholders: &Placeholders) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_text(&mut out, report, placeholders)?;
    Ok(out)
}

/// Same as [`render_text`], streamed into any `fmt::Write` sink
pub fn write_text<W: fmt::Write>(
    out: &mut W,
    report: &SearchReport,
    placeholders: &Placeholders,
) -> fmt::Result {
    let paper = format_paper(&report.paper, placeholders);

    writeln!(out, "{}", paper.title)?;
    writeln!(out, "  Authors: {}", paper.authors)?;
    writeln!(out, "  Journal: {}", paper.venue)?;
    writeln!(out, "  Year:    {}", paper.year)?;
    match &paper.link {
        Some(link) => writeln!(out, "  DOI:     {} ({})", paper.doi, link)?,
        None => writeln!(out, "  DOI:     {}", paper.doi)?,
    }
    writeln!(out)?;

    match &report.tree {
        TreeOutcome::NoReferences => writeln!(out, "{}", placeholders.no_references),
        TreeOutcome::Populated(nodes) => {
            let root = Tree::new("References".to_string())
                .with_leaves(nodes.iter().map(|n| node_tree(n, placeholders)));
            write!(out, "{}", root)
        }
    }
}

fn node_tree(node: &ReferenceNode, placeholders: &Placeholders) -> Tree<String> {
    Tree::new(node_label(&node.paper, placeholders))
        .with_leaves(node.children.iter().map(|c| node_tree(c, placeholders)))
}

fn node_label(reference: &ReferenceSummary, placeholders: &Placeholders) -> String {
    let display = format_reference(reference, placeholders);
    let mut label = format!(
        "{} | {} | {} | {}",
        display.title, display.authors, display.venue, display.year
    );
    if let Some(link) = display.link {
        label.push_str(" | ");
        label.push_str(&link);
    }
    label
}

pub fn render_json(report: &SearchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeStats;

    fn paper() -> PaperSummary {
        PaperSummary {
            id: "10.1/root".into(),
            title: Some("Root Paper".into()),
            authors: vec!["Ada Lovelace".into(), "Alan Turing".into()],
            year: Some(1950),
            venue: Some("Mind".into()),
        }
    }

    fn reference(title: &str, doi: Option<&str>, depth: usize) -> ReferenceNode {
        ReferenceNode {
            paper: ReferenceSummary {
                id: doi.map(String::from),
                title: Some(title.into()),
                authors: Some("Smith".into()),
                venue: Some("Journal".into()),
                year: Some("2001".into()),
            },
            depth,
            children: Vec::new(),
        }
    }

    fn report(tree: TreeOutcome) -> SearchReport {
        SearchReport {
            query: "root paper".into(),
            paper: paper(),
            tree,
            stats: TreeStats::default(),
        }
    }

    #[test]
    fn test_format_paper() {
        let display = format_paper(&paper(), &Placeholders::default());
        assert_eq!(display.title, "Root Paper");
        assert_eq!(display.authors, "Ada Lovelace, Alan Turing");
        assert_eq!(display.venue, "Mind");
        assert_eq!(display.year, "1950");
        assert_eq!(display.link.as_deref(), Some("https://doi.org/10.1/root"));
    }

    #[test]
    fn test_missing_fields_use_every_placeholder() {
        let placeholders = Placeholders::default();

        let display = format_reference(&ReferenceSummary::default(), &placeholders);
        assert_eq!(display.title, placeholders.title);
        assert_eq!(display.authors, placeholders.authors);
        assert_eq!(display.venue, placeholders.venue);
        assert_eq!(display.year, placeholders.year);
        assert_eq!(display.doi, None);
        assert_eq!(display.link, None);

        let bare = PaperSummary {
            id: String::new(),
            title: None,
            authors: Vec::new(),
            year: None,
            venue: None,
        };
        let display = format_paper(&bare, &placeholders);
        assert_eq!(display.title, "No title");
        assert_eq!(display.authors, "No author information");
        assert_eq!(display.venue, "No journal information");
        assert_eq!(display.year, "No year information");
        assert_eq!(display.doi, "No DOI");
        assert_eq!(display.link, None);
    }

    #[test]
    fn test_custom_placeholders() {
        let placeholders = Placeholders {
            title: "?".into(),
            ..Default::default()
        };
        let display = format_reference(&ReferenceSummary::default(), &placeholders);
        assert_eq!(display.title, "?");
    }

    #[test]
    fn test_render_text_no_references() {
        let text = render_text(&report(TreeOutcome::NoReferences), &Placeholders::default()).unwrap();
        assert!(text.starts_with("Root Paper\n"));
        assert!(text.contains("Authors: Ada Lovelace, Alan Turing"));
        assert!(text.trim_end().ends_with("No references found."));
    }

    #[test]
    fn test_render_text_tree() {
        let mut parent = reference("Parent", Some("10.1/p"), 0);
        parent.children.push(reference("Child", None, 1));
        let tree = TreeOutcome::Populated(vec![parent, reference("Sibling", None, 0)]);

        let text = render_text(&report(tree), &Placeholders::default()).unwrap();
        assert!(text.contains("References"));
        assert!(text.contains("Parent | Smith | Journal | 2001 | https://doi.org/10.1/p"));
        assert!(text.contains("Child | Smith | Journal | 2001"));

        let parent_line = text.lines().position(|l| l.contains("Parent")).unwrap();
        let child_line = text.lines().position(|l| l.contains("Child")).unwrap();
        let sibling_line = text.lines().position(|l| l.contains("Sibling")).unwrap();
        assert!(parent_line < child_line && child_line < sibling_line);
    }

    #[test]
    fn test_render_json() {
        let tree = TreeOutcome::Populated(vec![reference("Only", Some("10.1/o"), 0)]);
        let json = render_json(&report(tree)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["paper"]["id"], "10.1/root");
        assert_eq!(value["tree"]["status"], "populated");
        assert_eq!(value["tree"]["references"][0]["paper"]["title"], "Only");

        let empty = render_json(&report(TreeOutcome::NoReferences)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&empty).unwrap();
        assert_eq!(value["tree"]["status"], "no_references");
    }

    /// Sink that refuses every write
    struct ClosedSink;

    impl fmt::Write for ClosedSink {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_write_text_propagates_sink_errors() {
        let tree = TreeOutcome::Populated(vec![reference("Only", None, 0)]);
        assert!(write_text(&mut ClosedSink, &report(tree), &Placeholders::default()).is_err());

        let mut out = String::new();
        assert!(write_text(&mut out, &report(TreeOutcome::NoReferences), &Placeholders::default()).is_ok());
        assert!(out.ends_with("No references found.\n"));
    }
}
