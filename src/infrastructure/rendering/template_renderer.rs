//! Tera-based artifact renderer
//!
//! Renders every artifact of a run into Rust source and groups the results
//! by target file. Artifacts sharing a file are concatenated in artifact
//! order.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use tera::{Context, Tera};

use super::context::RustContextBuilder;
use super::errors::RenderError;
use crate::application::{ApplicationError, ArtifactRenderer, RenderedFile};
use crate::config::GeneratorSettings;
use crate::generation::{Artifact, ArtifactKind, GenerationOutput};

const MODULE_TEMPLATE: &str = "module.rs";
const REGISTRATION_TEMPLATE: &str = "registration.rs";

static BLANK_RUNS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank line pattern"));
static TRAILING_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t]+$").expect("valid trailing space pattern"));

/// Tera-based renderer for Rust client bindings
pub struct TeraArtifactRenderer {
    tera: Tera,
}

impl TeraArtifactRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (MODULE_TEMPLATE, include_str!("templates/module.rs.tera")),
            (
                REGISTRATION_TEMPLATE,
                include_str!("templates/registration.rs.tera"),
            ),
        ])?;
        Ok(Self { tera })
    }

    /// Render the artifacts of `output` into one source text per file
    pub fn render_output(
        &self,
        output: &GenerationOutput,
        settings: &GeneratorSettings,
        document_title: Option<&str>,
    ) -> Result<Vec<RenderedFile>, RenderError> {
        let artifacts = &output.artifacts.artifacts;
        let builder = RustContextBuilder::new(settings, &output.contracts, artifacts, document_title);

        let mut files: Vec<(PathBuf, String)> = Vec::new();
        for artifact in artifacts {
            let position = files.iter().position(|(path, _)| path == &artifact.file);
            let appended = position.is_some();
            let text = self.render_artifact(&builder, artifact, !appended)?;

            match position {
                Some(position) => {
                    let content = &mut files[position].1;
                    content.push('\n');
                    content.push_str(&text);
                }
                None => files.push((artifact.file.clone(), text)),
            }
        }

        Ok(files
            .into_iter()
            .map(|(path, content)| RenderedFile {
                path,
                content: tidy(&content),
            })
            .collect())
    }

    fn render_artifact(
        &self,
        builder: &RustContextBuilder<'_>,
        artifact: &Artifact,
        standalone: bool,
    ) -> Result<String, RenderError> {
        tracing::debug!(
            "Rendering {:?} artifact '{}' to {}",
            artifact.kind,
            artifact.name,
            artifact.file.display()
        );

        let (template, context) = match (artifact.kind, &artifact.body.registration) {
            (ArtifactKind::Registration, Some(registration)) => (
                REGISTRATION_TEMPLATE,
                Context::from_serialize(builder.registration(registration, standalone)),
            ),
            _ => (
                MODULE_TEMPLATE,
                Context::from_serialize(builder.module(artifact)),
            ),
        };
        let context = context.map_err(|e| RenderError::Context {
            artifact: artifact.name.clone(),
            message: e.to_string(),
        })?;

        Ok(self.tera.render(template, &context)?)
    }
}

#[async_trait]
impl ArtifactRenderer for TeraArtifactRenderer {
    async fn render(
        &self,
        output: &GenerationOutput,
        settings: &GeneratorSettings,
        document_title: Option<&str>,
    ) -> Result<Vec<RenderedFile>, ApplicationError> {
        Ok(self.render_output(output, settings, document_title)?)
    }
}

/// Collapse blank-line runs, strip trailing whitespace and end with one newline
fn tidy(content: &str) -> String {
    let content = TRAILING_SPACE_RE.replace_all(content, "");
    let content = BLANK_RUNS_RE.replace_all(&content, "\n\n");
    format!("{}\n", content.trim())
}
