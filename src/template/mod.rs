mod escape;

use std::error::Error as StdError;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::value::Value;
use minijinja::{
    AutoEscape, Environment, Error as TemplateError, Template, UndefinedBehavior, context,
};

use crate::error::PublishError;

/// HTML that is inserted into templates verbatim.
///
/// Only the Markdown renderer hands these out; every plain `String` that
/// reaches a template goes through HTML escaping instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<TrustedHtml> for Value {
    fn from(html: TrustedHtml) -> Self {
        Value::from_safe_string(html.0)
    }
}

/// The record a page template is executed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData {
    pub title: String,
    pub author: String,
    pub body: TrustedHtml,
}

impl PageData {
    fn to_context(&self) -> Value {
        context! {
            title => self.title.as_str(),
            author => self.author.as_str(),
            body => Value::from(self.body.clone()),
        }
    }
}

pub fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(auto_escape_for);
    env.set_formatter(escape::html_formatter);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// `index.html.tmpl` escapes like `index.html`.
fn auto_escape_for(name: &str) -> AutoEscape {
    minijinja::default_auto_escape_callback(name.strip_suffix(".tmpl").unwrap_or(name))
}

/// A page template read from disk and checked for syntax errors.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    path: PathBuf,
    name: String,
    source: String,
}

impl PageTemplate {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PublishError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| PublishError::LoadTemplate {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::checked(path.to_path_buf(), name, source)
    }

    pub fn from_source(
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, PublishError> {
        let name = name.into();
        Self::checked(PathBuf::from(&name), name, source.into())
    }

    fn checked(path: PathBuf, name: String, source: String) -> Result<Self, PublishError> {
        let template = Self { path, name, source };
        let env = environment();
        template.compile(&env)?;
        Ok(template)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(&self, page: &PageData) -> Result<String, PublishError> {
        let env = environment();
        let template = self.compile(&env)?;
        template
            .render(page.to_context())
            .map_err(|err| PublishError::RenderTemplate {
                path: self.path.clone(),
                detail: describe_template_error(&self.name, err),
            })
    }

    fn compile<'env, 'source>(
        &'source self,
        env: &'env Environment<'static>,
    ) -> Result<Template<'env, 'source>, PublishError> {
        env.template_from_named_str(&self.name, &self.source)
            .map_err(|err| PublishError::ParseTemplate {
                path: self.path.clone(),
                detail: describe_template_error(&self.name, err),
            })
    }
}

/// Flatten a minijinja error into one line: template, line, kind, detail and
/// cause.
fn describe_template_error(template_name: &str, err: TemplateError) -> String {
    let actual_template = err.name().unwrap_or(template_name).to_string();
    let detail = err.detail().map(str::to_string);
    let summary = err.to_string();
    let nested = StdError::source(&err).map(|source| source.to_string());

    let mut message = String::new();
    let _ = write!(&mut message, "template '{}'", actual_template);

    if let Some(line_no) = err.line() {
        let _ = write!(&mut message, " at line {}", line_no);
    }

    let _ = write!(&mut message, " ({:?})", err.kind());

    let payload = detail.unwrap_or(summary);
    let _ = write!(&mut message, ": {}", payload);

    if let Some(source) = nested {
        let _ = write!(&mut message, "; caused by: {}", source);
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEFAULT_TEMPLATE: &str = include_str!("../../templates/index.html.tmpl");

    fn page(title: &str, author: &str, body: &str) -> PageData {
        PageData {
            title: title.to_string(),
            author: author.to_string(),
            body: TrustedHtml::new(body),
        }
    }

    #[test]
    fn body_is_inserted_verbatim() {
        let template =
            PageTemplate::from_source("index.html.tmpl", "<main>{{ body }}</main>").unwrap();
        let rendered = template
            .render(&page("t", "a", "<p>hi &amp; bye</p>"))
            .unwrap();
        assert_eq!(rendered, "<main><p>hi &amp; bye</p></main>");
    }

    #[test]
    fn title_and_author_are_escaped() {
        let template =
            PageTemplate::from_source("index.html.tmpl", "{{ title }}|{{ author }}").unwrap();
        let rendered = template
            .render(&page("<b>Fish & \"Chips\"</b>", "O'Brien", ""))
            .unwrap();
        assert_eq!(
            rendered,
            "&lt;b&gt;Fish &amp; &#34;Chips&#34;&lt;/b&gt;|O&#39;Brien"
        );
    }

    #[test]
    fn slashes_survive_escaping() {
        let template = PageTemplate::from_source("index.html.tmpl", "{{ title }}").unwrap();
        let rendered = template
            .render(&page("Performing A/B testing with Edge Scripting", "", ""))
            .unwrap();
        assert_eq!(rendered, "Performing A/B testing with Edge Scripting");
    }

    #[test]
    fn default_template_uses_each_field_once() {
        let template = PageTemplate::from_source("index.html.tmpl", DEFAULT_TEMPLATE).unwrap();
        let rendered = template
            .render(&page(
                "Performing A/B testing with Edge Scripting",
                "Thomas Labarussias",
                "<p>hi</p>",
            ))
            .unwrap();

        assert_eq!(
            rendered
                .matches("Performing A/B testing with Edge Scripting")
                .count(),
            1
        );
        assert_eq!(rendered.matches("Thomas Labarussias").count(), 1);
        assert!(rendered.contains("<p>hi</p>"), "{rendered}");
    }

    #[test]
    fn load_reads_template_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html.tmpl");
        fs::write(&path, "<h1>{{ title }}</h1>").unwrap();

        let template = PageTemplate::load(&path).unwrap();
        assert_eq!(template.path(), path.as_path());
        let rendered = template.render(&page("A & B", "", "")).unwrap();
        assert_eq!(rendered, "<h1>A &amp; B</h1>");
    }

    #[test]
    fn missing_template_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.html.tmpl");

        let error = PageTemplate::load(&path).unwrap_err();
        assert!(matches!(error, PublishError::LoadTemplate { .. }), "{error}");
        assert!(error.to_string().contains("missing.html.tmpl"));
    }

    #[test]
    fn syntax_error_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html.tmpl");
        fs::write(&path, "<p>\n{% if title %}\n{{ title }}").unwrap();

        let error = PageTemplate::load(&path).unwrap_err();
        assert!(matches!(error, PublishError::ParseTemplate { .. }), "{error}");
        let message = error.to_string();
        assert!(message.contains("template 'index.html.tmpl'"), "{message}");
        assert!(message.contains("SyntaxError"), "{message}");
    }

    #[test]
    fn undefined_field_is_a_render_error() {
        let template =
            PageTemplate::from_source("index.html.tmpl", "{{ subtitle }}").unwrap();
        let error = template.render(&page("t", "a", "")).unwrap_err();
        assert!(matches!(error, PublishError::RenderTemplate { .. }), "{error}");
        assert!(error.to_string().contains("UndefinedError"), "{error}");
    }

    #[test]
    fn trailing_newline_is_kept() {
        let template =
            PageTemplate::from_source("index.html.tmpl", "<p>{{ author }}</p>\n").unwrap();
        let rendered = template.render(&page("t", "a", "")).unwrap();
        assert_eq!(rendered, "<p>a</p>\n");
    }

    #[test]
    fn plain_templates_are_not_escaped() {
        let template = PageTemplate::from_source("notes.txt", "{{ title }}").unwrap();
        let rendered = template.render(&page("a < b", "", "")).unwrap();
        assert_eq!(rendered, "a < b");
    }

    #[test]
    fn auto_escape_ignores_tmpl_suffix() {
        assert!(matches!(auto_escape_for("index.html.tmpl"), AutoEscape::Html));
        assert!(matches!(auto_escape_for("index.html"), AutoEscape::Html));
        assert!(matches!(auto_escape_for("notes.txt"), AutoEscape::None));
    }
}
