//! Use case for generating client bindings from one settings value

use std::sync::Arc;

use crate::application::{
    ApplicationError, ArtifactRenderer, DocumentLoader, GenerateRequest, GenerateResponse,
    OutputService,
};
use crate::generation::{ArtifactKind, Engine};

/// Use case for generating client bindings
pub struct GenerateClientUseCase {
    loader: Arc<dyn DocumentLoader>,
    renderer: Arc<dyn ArtifactRenderer>,
    output_service: Arc<dyn OutputService>,
}

impl GenerateClientUseCase {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        renderer: Arc<dyn ArtifactRenderer>,
        output_service: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            loader,
            renderer,
            output_service,
        }
    }

    pub async fn execute(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, ApplicationError> {
        // 1. Validate request and settings
        let source = request.source()?.to_string();
        let engine = Engine::new(request.settings.clone())?;

        // 2. Load the OpenAPI document
        tracing::info!("Loading OpenAPI document from {source}");
        let document = self.loader.load(&source).await?;

        // 3. Run the synthesis engine
        let output = engine.generate(&document)?;
        for warning in &output.warnings {
            tracing::warn!("{warning}");
        }

        // 4. Render artifacts to source files
        let files = self
            .renderer
            .render(&output, engine.settings(), document.title())
            .await?;

        // 5. Write files
        if !request.dry_run {
            self.output_service
                .ensure_directory(&engine.settings().output_folder)
                .await?;
            self.output_service.write_files(&files).await?;
            tracing::info!("Wrote {} files", files.len());
        }

        let interface_count = output
            .artifacts
            .of_kind(ArtifactKind::Interface)
            .map(|a| a.body.interfaces.len())
            .sum();
        let contract_count = output.artifacts.iter().map(|a| a.body.contracts.len()).sum();

        Ok(GenerateResponse {
            source,
            files,
            interface_count,
            contract_count,
            warnings: output.warnings,
            written: !request.dry_run,
        })
    }
}
