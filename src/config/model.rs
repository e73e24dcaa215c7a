use std::path::{Path, PathBuf};

use crate::markdown::MarkdownOptions;

pub const CONTENT_FILE: &str = "content.md";
pub const TEMPLATE_FILE: &str = "templates/index.html.tmpl";
pub const OUTPUT_FILE: &str = "index.html";

pub const DEFAULT_TITLE: &str = "Performing A/B testing with Edge Scripting";
pub const DEFAULT_AUTHOR: &str = "Thomas Labarussias";

/// Everything a single publish run needs: where to read, where to write, and
/// the page metadata handed to the template next to the rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub content_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub title: String,
    pub author: String,
    pub markdown: MarkdownOptions,
    pub verbose: bool,
}

impl Config {
    /// Default configuration with the three file paths resolved against `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            content_path: root.join(CONTENT_FILE),
            template_path: root.join(TEMPLATE_FILE),
            output_path: root.join(OUTPUT_FILE),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from(CONTENT_FILE),
            template_path: PathBuf::from(TEMPLATE_FILE),
            output_path: PathBuf::from(OUTPUT_FILE),
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            markdown: MarkdownOptions::default(),
            verbose: false,
        }
    }
}
