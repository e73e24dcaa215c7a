use comrak::Arena;
use comrak::html::{escape, escape_href};
use comrak::nodes::{AstNode, NodeValue};

/// Swap every non-relative link for raw `<a … target="_blank">` tags around
/// its original children.
pub(super) fn open_in_new_tab<'a>(arena: &'a Arena<AstNode<'a>>, root: &'a AstNode<'a>) {
    let links: Vec<_> = root
        .descendants()
        .filter(|node| is_external_link(node))
        .collect();

    for link in links {
        let opening = match &link.data.borrow().value {
            NodeValue::Link(target) => opening_tag(&target.url, &target.title),
            _ => continue,
        };

        link.insert_before(html_inline(arena, opening));
        for child in link.children().collect::<Vec<_>>() {
            link.insert_before(child);
        }
        link.insert_before(html_inline(arena, "</a>".to_string()));
        link.detach();
    }
}

fn is_external_link(node: &AstNode<'_>) -> bool {
    match &node.data.borrow().value {
        NodeValue::Link(target) => !is_relative(&target.url),
        _ => false,
    }
}

/// Fragments, root-relative paths and `./` or `../` paths stay in the current
/// tab. Protocol-relative `//host` links do not count as relative.
pub(super) fn is_relative(url: &str) -> bool {
    url.is_empty()
        || url.starts_with('#')
        || (url.starts_with('/') && !url.starts_with("//"))
        || url.starts_with("./")
        || url.starts_with("../")
}

fn opening_tag(url: &str, title: &str) -> String {
    let mut tag = String::from("<a href=\"");
    escape_href(&mut tag, url, false).expect("writing to String cannot fail");
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(" title=\"");
        escape(&mut tag, title).expect("writing to String cannot fail");
        tag.push('"');
    }
    tag.push_str(" target=\"_blank\">");
    tag
}

fn html_inline<'a>(arena: &'a Arena<AstNode<'a>>, html: String) -> &'a AstNode<'a> {
    arena.alloc(AstNode::from(NodeValue::HtmlInline(html)))
}
