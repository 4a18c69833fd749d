//! The generation pipeline.
//!
//! Stages run strictly in order and the first failure stops the run:
//!
//! 1. **Resolve** the declaration (skipped when no source directory is set)
//! 2. **Describe** it
//! 3. **Load** the template
//! 4. **Render**
//! 5. **Format** with rustfmt (optional)
//! 6. **Write** to the destination
//!
//! Writing is last, so a failed render or format never leaves a partial file.

use crate::error::{Error, Result};
use crate::extract::{self, DEFAULT_ANNOTATION_KEY};
use crate::format::{self, DEFAULT_EDITION};
use crate::model::{Description, Shape};
use crate::output::Destination;
use crate::render::Renderer;
use crate::resolve::{SourceResolver, SynResolver};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the template text comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Inline(String),
    File(PathBuf),
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Declaration to describe.
    pub name: String,
    /// Source directory. `None` renders a bare description without reading any source.
    pub dir: Option<PathBuf>,
    pub template: TemplateSource,
    /// Output file; stdout when absent.
    pub output: Option<PathBuf>,
    /// Run rustfmt on the rendered output.
    pub format: bool,
    pub edition: String,
    /// Attribute name carrying field annotations.
    pub annotation_key: String,
}

impl GeneratorConfig {
    pub fn new(name: impl Into<String>, template: TemplateSource) -> Self {
        GeneratorConfig {
            name: name.into(),
            dir: None,
            template,
            output: None,
            format: false,
            edition: DEFAULT_EDITION.to_string(),
            annotation_key: DEFAULT_ANNOTATION_KEY.to_string(),
        }
    }
}

pub struct Generator {
    config: GeneratorConfig,
    resolver: Box<dyn SourceResolver>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Generator {
            config,
            resolver: Box::new(SynResolver),
        }
    }

    /// Replace the default `syn` resolver.
    pub fn with_resolver(mut self, resolver: impl SourceResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Resolve and describe the configured declaration.
    pub fn describe(&self) -> Result<Description> {
        let name = &self.config.name;
        let Some(ref dir) = self.config.dir else {
            debug!("no source directory, describing `{}` without resolution", name);
            return Ok(Description::new(name.as_str(), Shape::Other));
        };

        let resolved = self.resolver.resolve(dir, name)?;
        debug!(package = %resolved.package.path, "resolved `{}`", name);
        let desc = extract::describe(name, &resolved, &self.config.annotation_key)?;
        debug!(
            methods = desc.shape().methods().len(),
            fields = desc.shape().fields().len(),
            imports = desc.imports.len(),
            "described `{}`",
            name
        );
        Ok(desc)
    }

    /// Run every stage except the final write and return the generated code.
    pub fn generate(&self) -> Result<String> {
        info!(name = %self.config.name, "generating code");

        let desc = self.describe()?;
        let template = self.load_template()?;
        let rendered = Renderer::new().render(&template, &desc)?;
        debug!(bytes = rendered.len(), "rendered template");

        if !self.config.format {
            return Ok(rendered);
        }
        let formatted = format::rustfmt(
            &rendered,
            &self.config.edition,
            self.config.output.as_deref(),
        )?;
        Ok(formatted)
    }

    /// Generate and write. An explicit `stream` takes precedence over the
    /// configured output path, which takes precedence over stdout.
    pub fn run(&self, stream: Option<&mut dyn Write>) -> Result<()> {
        let content = self.generate()?;
        let dest = Destination::select(stream, self.config.output.as_deref());
        let label = dest.to_string();
        debug!(destination = %label, "writing output");
        dest.write(content.as_bytes()).map_err(|source| Error::Io {
            context: format!("failed to write {}", label),
            source,
        })
    }

    fn load_template(&self) -> Result<String> {
        match self.config.template {
            TemplateSource::Inline(ref template) => Ok(template.clone()),
            TemplateSource::File(ref path) => {
                debug!(path = %path.display(), "loading template");
                fs::read_to_string(path).map_err(|source| Error::Io {
                    context: format!("failed to read template {}", path.display()),
                    source,
                })
            }
        }
    }
}
