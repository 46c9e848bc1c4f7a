//! HTML status page served at `/`.

use handlebars::Handlebars;
use serde::Serialize;

/// Template name registered with the Handlebars registry.
const STATUS_TEMPLATE_NAME: &str = "status";

const STATUS_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
	<body>
		<h1>Pull Tabs instance {{instance}}</h1>
		<p>Watching for label: {{label}}</p>
	</body>
</html>
"#;

/// `Content-Type` of the status page.
pub const STATUS_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// `Cache-Control` of the status page.
pub const STATUS_CACHE_CONTROL: &str = "max-age=0, no-cache";

#[derive(Serialize)]
struct StatusContext<'a> {
    instance: &'a str,
    label: &'a str,
}

/// Pre-compiled status page bound to this process's identity.
///
/// Interpolated values are HTML-escaped, so a label such as `<b>` shows up
/// literally.
#[derive(Debug, Clone)]
pub struct StatusPage {
    registry: Handlebars<'static>,
    instance_id: String,
    label: String,
}

impl StatusPage {
    /// Compile the template.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in template does not parse.
    pub fn new(
        instance_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(STATUS_TEMPLATE_NAME, STATUS_TEMPLATE)?;

        Ok(Self {
            registry,
            instance_id: instance_id.into(),
            label: label.into(),
        })
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn render(&self) -> Result<String, handlebars::RenderError> {
        self.registry.render(
            STATUS_TEMPLATE_NAME,
            &StatusContext {
                instance: &self.instance_id,
                label: &self.label,
            },
        )
    }
}
