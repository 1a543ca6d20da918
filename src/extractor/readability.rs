//! Main-content detection over a parsed HTML tree.
//!
//! Paragraph-like elements vote for their nearest ancestors; the ancestor with
//! the best link-density-adjusted score wins and its text, together with
//! related siblings, becomes the article body.

use std::{collections::HashMap, sync::LazyLock};

use dom_query::{Document, NodeId, NodeRef, Selection};
use regex::Regex;

use crate::{
    config::ExtractorConfig,
    error::{DigestError, DigestResult},
    util::html::{collapse_whitespace, normalize_lines},
};

const NON_CONTENT_TAGS: &str = "script, style, noscript, template, iframe, object, embed, svg, \
     canvas, form, button, input, select, textarea, nav, footer, aside, link, meta";

const SCORED_TAGS: &str = "p, pre, td, blockquote, div, section, article";

/// Containers that only count as a paragraph when nothing inside them is
/// block-level.
const DIV_LIKE_TAGS: &[&str] = &["div", "section", "article"];

const DIV_BLOCK_CHILDREN: &str =
    "blockquote, dl, div, img, ol, p, pre, table, ul, section, article";

const PROTECTED_TAGS: &[&str] = &["html", "body", "article", "main"];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table", "td",
    "th", "tr", "ul",
];

/// Ancestor levels a paragraph contributes to, with their dividers.
const ANCESTOR_DIVIDERS: [f64; 3] = [1.0, 2.0, 3.0];

#[allow(clippy::expect_used)]
static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)banner|breadcrumb|combx|comment|community|cookie|disqus|extra|footer|header|menu|modal|related|remark|rss|share|shoutbox|sidebar|skyscraper|social|sponsor|ad-break|agegate|pagination|pager|popup|newsletter|subscribe|promo",
    )
    .expect("valid regex")
});

#[allow(clippy::expect_used)]
static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|shadow").expect("valid regex")
});

#[allow(clippy::expect_used)]
static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story")
        .expect("valid regex")
});

#[allow(clippy::expect_used)]
static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)hidden|banner|combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget|ad-",
    )
    .expect("valid regex")
});

/// Extract the article body of `html` as plain text, one block per line.
pub fn extract_article_text(html: &str, opts: &ExtractorConfig) -> DigestResult<String> {
    let doc = Document::from(html);
    remove_non_content(&doc);
    remove_unlikely_candidates(&doc);

    let candidates = score_candidates(&doc, opts.min_paragraph_len);
    let Some(winner) = candidates.best() else {
        return Err(DigestError::ExtractionFailed(
            "no paragraph passed the minimum text length".to_string(),
        ));
    };

    tracing::debug!(
        candidates = candidates.len(),
        score = winner.score,
        tag = %tag_name(&winner.node),
        "content block selected"
    );

    let mut raw = String::new();
    for node in article_nodes(&winner, &candidates) {
        raw.push('\n');
        push_text(&node, &mut raw);
        raw.push('\n');
    }

    let text = normalize_lines(&raw);
    if text.is_empty() {
        return Err(DigestError::ExtractionFailed(
            "content block has no text".to_string(),
        ));
    }
    Ok(text)
}

fn remove_non_content(doc: &Document) {
    doc.select(NON_CONTENT_TAGS).remove();

    // Page headers go; headers inside the article itself stay.
    let headers: Vec<NodeRef<'_>> = doc.select("header").nodes().to_vec();
    for header in headers {
        let in_article = header
            .ancestors(None)
            .into_iter()
            .any(|ancestor| matches!(tag_name(&ancestor).as_str(), "article" | "main"));
        if !in_article {
            Selection::from(header).remove();
        }
    }
}

fn remove_unlikely_candidates(doc: &Document) {
    let nodes: Vec<NodeRef<'_>> = doc.select("[class], [id]").nodes().to_vec();
    for node in nodes {
        if PROTECTED_TAGS.contains(&tag_name(&node).as_str()) {
            continue;
        }
        let signature = class_and_id(&node);
        if UNLIKELY_CANDIDATES.is_match(&signature) && !MAYBE_CANDIDATE.is_match(&signature) {
            Selection::from(node).remove();
        }
    }
}

#[derive(Clone)]
struct Candidate<'a> {
    node: NodeRef<'a>,
    score: f64,
}

/// Candidates in first-seen order, so equal scores resolve to the earlier block.
struct Candidates<'a> {
    order: Vec<Candidate<'a>>,
    index: HashMap<NodeId, usize>,
}

impl<'a> Candidates<'a> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, node: &NodeRef<'a>, score: f64) {
        let slot = match self.index.get(&node.id) {
            Some(slot) => *slot,
            None => {
                self.order.push(Candidate {
                    node: node.clone(),
                    score: initial_score(node),
                });
                self.index.insert(node.id, self.order.len() - 1);
                self.order.len() - 1
            }
        };
        self.order[slot].score += score;
    }

    fn scale_by_link_density(&mut self) {
        for candidate in &mut self.order {
            candidate.score *= 1.0 - link_density(&candidate.node);
        }
    }

    fn get(&self, id: &NodeId) -> Option<&Candidate<'a>> {
        self.index.get(id).map(|slot| &self.order[*slot])
    }

    fn best(&self) -> Option<Candidate<'a>> {
        let mut best: Option<&Candidate<'a>> = None;
        for candidate in &self.order {
            if best.map_or(true, |current| candidate.score > current.score) {
                best = Some(candidate);
            }
        }
        best.cloned()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

fn score_candidates(doc: &Document, min_paragraph_len: usize) -> Candidates<'_> {
    let mut candidates = Candidates::new();

    for paragraph in doc.select(SCORED_TAGS).nodes() {
        if DIV_LIKE_TAGS.contains(&tag_name(paragraph).as_str()) && has_block_children(paragraph) {
            continue;
        }
        let text = collapse_whitespace(&paragraph.text());
        let length = text.chars().count();
        if length < min_paragraph_len.max(1) {
            continue;
        }

        let commas = text.matches(',').count() as f64;
        let score = 1.0 + commas + (length as f64 / 100.0).floor().min(3.0);

        let mut current = paragraph.parent();
        for divider in ANCESTOR_DIVIDERS {
            let Some(ancestor) = current else {
                break;
            };
            if !ancestor.is_element() || tag_name(&ancestor) == "html" {
                break;
            }
            candidates.add(&ancestor, score / divider);
            current = ancestor.parent();
        }
    }

    candidates.scale_by_link_density();
    candidates
}

fn has_block_children(node: &NodeRef<'_>) -> bool {
    Selection::from(node.clone())
        .select(DIV_BLOCK_CHILDREN)
        .exists()
}

fn initial_score(node: &NodeRef<'_>) -> f64 {
    let base = match tag_name(node).as_str() {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    base + class_weight(node)
}

fn class_weight(node: &NodeRef<'_>) -> f64 {
    let mut weight = 0.0;
    for value in [node.attr("class"), node.attr("id")].into_iter().flatten() {
        if value.trim().is_empty() {
            continue;
        }
        if NEGATIVE.is_match(&value) {
            weight -= 25.0;
        }
        if POSITIVE.is_match(&value) {
            weight += 25.0;
        }
    }
    weight
}

/// Share of the node's text that sits inside links.
fn link_density(node: &NodeRef<'_>) -> f64 {
    let sel = Selection::from(node.clone());
    let total = collapse_whitespace(&sel.text()).chars().count();
    if total == 0 {
        return 0.0;
    }
    let linked: usize = sel
        .select("a")
        .nodes()
        .iter()
        .map(|link| collapse_whitespace(&link.text()).chars().count())
        .sum();
    (linked as f64 / total as f64).min(1.0)
}

/// The winner plus siblings that look like part of the same article.
fn article_nodes<'a>(winner: &Candidate<'a>, candidates: &Candidates<'a>) -> Vec<NodeRef<'a>> {
    let Some(parent) = winner.node.parent().filter(|p| p.is_element()) else {
        return vec![winner.node.clone()];
    };

    let threshold = (winner.score * 0.2).max(10.0);
    let mut nodes = Vec::new();

    for sibling in parent.children() {
        if !sibling.is_element() {
            continue;
        }
        if sibling.id == winner.node.id {
            nodes.push(sibling);
            continue;
        }
        if let Some(candidate) = candidates.get(&sibling.id) {
            if candidate.score >= threshold {
                nodes.push(sibling);
                continue;
            }
        }
        if tag_name(&sibling) == "p" && is_related_paragraph(&sibling) {
            nodes.push(sibling);
        }
    }

    nodes
}

fn is_related_paragraph(node: &NodeRef<'_>) -> bool {
    let text = collapse_whitespace(&node.text());
    let length = text.chars().count();
    let density = link_density(node);
    if length > 80 {
        density < 0.25
    } else {
        length > 0 && density == 0.0 && text.ends_with('.')
    }
}

fn push_text(node: &NodeRef<'_>, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() {
            let tag = tag_name(&child);
            if tag == "br" {
                out.push('\n');
                continue;
            }
            let block = BLOCK_TAGS.contains(&tag.as_str());
            if block {
                out.push('\n');
            }
            push_text(&child, out);
            if block {
                out.push('\n');
            }
        }
    }
}

fn tag_name(node: &NodeRef<'_>) -> String {
    node.node_name()
        .map(|name| name.to_ascii_lowercase())
        .unwrap_or_default()
}

fn class_and_id(node: &NodeRef<'_>) -> String {
    let class = node.attr("class").map(|v| v.to_string()).unwrap_or_default();
    let id = node.attr("id").map(|v| v.to_string()).unwrap_or_default();
    format!("{class} {id}")
}
