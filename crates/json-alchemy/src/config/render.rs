//! Template rendering for `template` + `watch` derived fields.

use handlebars::Handlebars;
use serde_json::{Map, Value};

pub trait TemplateRenderer {
    fn render(&self, template: &str, values: &Map<String, Value>) -> Result<String, String>;
}

/// Handlebars with HTML escaping off: derived fields are data, not markup.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, values: &Map<String, Value>) -> Result<String, String> {
        self.registry
            .render_template(template, values)
            .map_err(|e| e.to_string())
    }
}
