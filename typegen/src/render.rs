//! Template rendering with Tera.
//!
//! Each [`Renderer`] owns its own `Tera` instance, so the set of template
//! helpers is whatever was registered on that instance.

use crate::model::Description;
use std::collections::HashMap;
use std::error::Error as StdError;
use tera::{Context, Tera, Value};
use thiserror::Error;

const TEMPLATE_NAME: &str = "typegen";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile template: {0}")]
    Compile(String),
    #[error("failed to render template: {0}")]
    Execute(String),
}

/// Tera engine with the default helpers registered:
///
/// - `quote` filter: `{{ name | quote }}` → `"Mock"`
/// - `quote` function: `{{ quote(value=name) }}`
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        // Output is source code, never HTML.
        tera.autoescape_on(Vec::new());
        tera.register_filter("quote", quote_filter);
        tera.register_function("quote", quote_function);
        Renderer { tera }
    }

    /// Add a filter available to templates rendered by this instance.
    pub fn register_filter<F: tera::Filter + 'static>(&mut self, name: &str, filter: F) {
        self.tera.register_filter(name, filter);
    }

    /// Compile `template` and render it against `desc`.
    pub fn render(&mut self, template: &str, desc: &Description) -> Result<String, RenderError> {
        self.tera
            .add_raw_template(TEMPLATE_NAME, template)
            .map_err(|e| RenderError::Compile(error_chain(&e)))?;
        let context =
            Context::from_serialize(desc).map_err(|e| RenderError::Execute(error_chain(&e)))?;
        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| RenderError::Execute(error_chain(&e)))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tera reports the useful part of an error in its sources.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Rust string literal for any template value.
fn quote_value(value: &Value) -> Value {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Value::String(format!("{:?}", text))
}

fn quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(quote_value(value))
}

fn quote_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    match args.get("value") {
        Some(value) => Ok(quote_value(value)),
        None => Err(tera::Error::msg("function `quote` expects a `value` argument")),
    }
}
