use std::collections::{HashMap, HashSet};

use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::html::escape;
use comrak::{Options, format_html};

const FALLBACK_ID: &str = "empty";

/// Replace every heading with pre-rendered HTML whose opening tag carries a
/// unique `id`. A trailing `{#id}` on the heading line sets the id explicitly.
pub(super) fn assign_ids<'a>(root: &'a AstNode<'a>, options: &Options<'_>) {
    let headings: Vec<_> = root
        .descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Heading(_)))
        .collect();

    let mut ids = IdRegistry::default();
    for heading in headings {
        let level = match &heading.data.borrow().value {
            NodeValue::Heading(meta) => meta.level,
            _ => continue,
        };
        let base =
            take_explicit_id(heading).unwrap_or_else(|| slugify(&collect_text(heading)));
        let id = ids.claim(&base);

        let mut rendered = String::new();
        format_html(heading, options, &mut rendered).expect("writing to String cannot fail");
        let literal = with_id(&rendered, level, &id);

        for child in heading.children().collect::<Vec<_>>() {
            child.detach();
        }
        // Type 6 is the CommonMark HTML block kind that covers h1-h6.
        heading.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 6,
            literal,
        });
    }
}

fn with_id(rendered: &str, level: u8, id: &str) -> String {
    let opening = format!("<h{level}>");
    match rendered.strip_prefix(opening.as_str()) {
        Some(rest) => {
            let mut tagged = format!("<h{level} id=\"");
            escape(&mut tagged, id).expect("writing to String cannot fail");
            tagged.push_str("\">");
            tagged.push_str(rest);
            tagged
        }
        None => rendered.to_string(),
    }
}

/// Strip a trailing `{#id}` from the heading's last text node and return the
/// id. Ids containing whitespace are left in the text.
fn take_explicit_id<'a>(heading: &'a AstNode<'a>) -> Option<String> {
    let last = heading.last_child()?;
    let mut ast = last.data.borrow_mut();
    let NodeValue::Text(literal) = &mut ast.value else {
        return None;
    };

    let body = literal.trim_end().strip_suffix('}')?;
    let start = body.rfind("{#")?;
    let id = body[start + 2..].trim();
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }

    let id = id.to_string();
    let kept = body[..start].trim_end().to_string();
    *literal = kept.into();
    Some(id)
}

/// Lowercase letters and digits, with a single `-` standing in for every run
/// of anything else between them.
pub(super) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        slug
    }
}

#[derive(Default)]
struct IdRegistry {
    taken: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl IdRegistry {
    fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }

        let mut suffix = self.next_suffix.get(base).copied().unwrap_or(1);
        loop {
            let candidate = format!("{base}-{suffix}");
            suffix += 1;
            if self.taken.insert(candidate.clone()) {
                self.next_suffix.insert(base.to_string(), suffix);
                return candidate;
            }
        }
    }
}

fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    collect(node, &mut text);
    text.trim().to_string()
}

fn collect<'a>(node: &'a AstNode<'a>, buf: &mut String) {
    use NodeValue::*;
    let value = node.data.borrow();
    match &value.value {
        Text(literal) => buf.push_str(literal),
        Code(code) => buf.push_str(&code.literal),
        SoftBreak | LineBreak => buf.push(' '),
        _ => {
            for child in node.children() {
                collect(child, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_joins_words_with_single_dash() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(
            slugify("Performing A/B testing with Edge Scripting"),
            "performing-a-b-testing-with-edge-scripting"
        );
    }

    #[test]
    fn slug_trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  -- 100% Rust! --  "), "100-rust");
    }

    #[test]
    fn slug_keeps_unicode_letters() {
        assert_eq!(slugify("Café Crème"), "café-crème");
    }

    #[test]
    fn slug_falls_back_when_nothing_is_kept() {
        assert_eq!(slugify("!!!"), "empty");
        assert_eq!(slugify(""), "empty");
    }

    #[test]
    fn registry_appends_increasing_suffixes() {
        let mut ids = IdRegistry::default();
        assert_eq!(ids.claim("intro"), "intro");
        assert_eq!(ids.claim("intro"), "intro-1");
        assert_eq!(ids.claim("intro"), "intro-2");
    }

    #[test]
    fn registry_skips_suffixes_already_taken() {
        let mut ids = IdRegistry::default();
        assert_eq!(ids.claim("intro"), "intro");
        assert_eq!(ids.claim("intro-1"), "intro-1");
        assert_eq!(ids.claim("intro"), "intro-2");
    }

    #[test]
    fn explicit_id_is_stripped_from_text() {
        let arena = comrak::Arena::new();
        let options = Options::default();
        let root = comrak::parse_document(&arena, "# Intro text {#start}\n", &options);
        let heading = root.first_child().unwrap();

        assert_eq!(take_explicit_id(heading).as_deref(), Some("start"));
        assert_eq!(collect_text(heading), "Intro text");
    }

    #[test]
    fn malformed_explicit_id_stays_in_text() {
        let arena = comrak::Arena::new();
        let options = Options::default();
        let root = comrak::parse_document(&arena, "# Sets {#a b}\n", &options);
        let heading = root.first_child().unwrap();

        assert_eq!(take_explicit_id(heading), None);
        assert_eq!(collect_text(heading), "Sets {#a b}");
    }

    #[test]
    fn opening_tag_gets_id() {
        assert_eq!(
            with_id("<h2>Setup</h2>\n", 2, "setup"),
            "<h2 id=\"setup\">Setup</h2>\n"
        );
    }
}
