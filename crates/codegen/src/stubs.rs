//! Stub file rendering from embedded Tera templates.

use anyhow::{Context, Result};
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;

use crate::{StubClass, StubConfig};

const HELPER_TEMPLATE: &str = "helper.stub.tera";

#[derive(Embed)]
#[folder = "templates/stubs/"]
struct StubTemplates;

/// Template context for the whole stub file.
#[derive(Serialize)]
struct HelperContext<'a> {
    source_dir: String,
    namespace: Option<&'a str>,
    generated_at: Option<&'a str>,
    classes: &'a [StubClass],
}

fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    for file_name in StubTemplates::iter() {
        let file = StubTemplates::get(&file_name)
            .with_context(|| format!("Failed to load embedded template: {}", file_name))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .with_context(|| format!("Template {} is not valid UTF-8", file_name))?;
        tera.add_raw_template(&file_name, content)
            .with_context(|| format!("Failed to register template: {}", file_name))?;
    }
    Ok(tera)
}

/// Render the stub file for `classes`.
pub fn render(config: &StubConfig, classes: &[StubClass]) -> Result<String> {
    let tera = load_templates()?;
    let context = HelperContext {
        source_dir: config.data_dir.display().to_string(),
        namespace: config.namespace.as_deref(),
        generated_at: config.generated_at.as_deref(),
        classes,
    };
    let ctx = tera::Context::from_serialize(&context).context("Failed to serialize context")?;
    tera.render(HELPER_TEMPLATE, &ctx)
        .with_context(|| format!("Failed to render template: {}", HELPER_TEMPLATE))
}
