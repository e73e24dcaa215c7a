//! Turn a single Markdown file into a static HTML page.
//!
//! The pipeline reads `content.md`, renders it with comrak, executes the
//! `templates/index.html.tmpl` minijinja template against the rendered body
//! and writes `index.html`. [`publish()`] runs the whole thing for a [`Config`].

pub mod config;
pub mod error;
pub mod markdown;
pub mod publish;
pub mod template;

pub use config::Config;
pub use error::PublishError;
pub use markdown::{MarkdownOptions, render_markdown};
pub use publish::publish;
pub use template::{PageData, PageTemplate, TrustedHtml};
