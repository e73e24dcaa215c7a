mod utils;


use std::fs;
use std::time::Instant;

use crate::config::Config;
use crate::error::PublishError;
use crate::markdown::render_markdown;
use crate::template::{PageData, PageTemplate};

use utils::{decode_markdown, log_status};

/// Read the Markdown source, render it into the page template and write the
/// result.
///
/// Steps run strictly in order and the first failure ends the run. The page
/// is rendered in memory before the output path is opened, so a failed run
/// never leaves a truncated output file behind.
pub fn publish(config: &Config) -> Result<(), PublishError> {
    let started = Instant::now();
    let verbose = config.verbose;

    log_status(
        verbose,
        "STEP",
        format!("Reading {}", config.content_path.display()),
    );
    let document = fs::read(&config.content_path).map_err(|source| PublishError::ReadInput {
        path: config.content_path.clone(),
        source,
    })?;

    log_status(verbose, "STEP", "Converting Markdown");
    let markdown = decode_markdown(&document, verbose);
    let body = render_markdown(&markdown, &config.markdown);

    log_status(
        verbose,
        "STEP",
        format!("Loading template {}", config.template_path.display()),
    );
    let template = PageTemplate::load(&config.template_path)?;

    let page = PageData {
        title: config.title.clone(),
        author: config.author.clone(),
        body,
    };
    let rendered = template.render(&page)?;

    log_status(
        verbose,
        "STEP",
        format!("Writing {}", config.output_path.display()),
    );
    fs::write(&config.output_path, rendered.as_bytes()).map_err(|source| {
        PublishError::CreateOutput {
            path: config.output_path.clone(),
            source,
        }
    })?;

    log_status(
        verbose,
        "DONE",
        format!(
            "Published {} ({} bytes) in {:.2?}",
            config.output_path.display(),
            rendered.len(),
            started.elapsed()
        ),
    );

    Ok(())
}
