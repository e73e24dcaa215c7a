mod headings;
mod links;

use comrak::{Arena, Options, format_html, parse_document};

use crate::template::TrustedHtml;

/// Switches for the optional behaviours layered on top of the base
/// CommonMark + GFM extension set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Give every heading an `id` derived from its text.
    pub heading_ids: bool,
    /// Add `target="_blank"` to every non-relative link.
    pub links_in_new_tab: bool,
    /// Curly quotes and typographic dashes.
    pub smart_punctuation: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            heading_ids: true,
            links_in_new_tab: true,
            smart_punctuation: true,
        }
    }
}

/// Render a Markdown document to an HTML fragment.
///
/// Never fails: malformed constructs degrade to literal text the way
/// CommonMark prescribes.
pub fn render_markdown(markdown: &str, settings: &MarkdownOptions) -> TrustedHtml {
    let options = options(settings);
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options);

    // Links first: heading ids render the heading contents, which must
    // already carry the rewritten anchors.
    if settings.links_in_new_tab {
        links::open_in_new_tab(&arena, root);
    }
    if settings.heading_ids {
        headings::assign_ids(root, &options);
    }

    let mut html = String::new();
    format_html(root, &options, &mut html).expect("writing to String cannot fail");

    TrustedHtml::new(html)
}

fn options(settings: &MarkdownOptions) -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.strikethrough = true;
    options.extension.description_lists = true;
    options.extension.math_dollars = true;
    options.parse.smart = settings.smart_punctuation;
    options.render.hardbreaks = false;
    options.render.r#unsafe = true;
    options.render.width = 0;
    options
}
