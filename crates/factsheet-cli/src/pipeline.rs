//! End-to-end factsheet generation.
//!
//! ```text
//! input document → text → compiled prompts → extraction record → rendered factsheet
//! ```
//!
//! Each stage's failure stops the run; nothing is written unless rendering
//! succeeds.

use crate::config::{Config, ProviderKind};
use crate::error::Result;
use factsheet_documents::DocumentReader;
use factsheet_domain::{CompiledPrompt, ExtractionRecord, LlmProvider, PromptSpecification, SpecificationLoader};
use factsheet_extractor::{ExtractionOutcome, Extractor, ExtractorConfig};
use factsheet_llm::{LlmError, MockProvider, OpenAiCompatibleProvider};
use factsheet_prompts::{DirectorySpecificationLoader, PromptCompiler, PromptError};
use factsheet_render::TemplateRenderer;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Model backend selected by configuration
pub enum ModelClient {
    /// Offline provider
    Mock(MockProvider),
    /// Chat-completions API
    Remote(OpenAiCompatibleProvider),
}

impl ModelClient {
    /// Build the configured provider.
    ///
    /// The mock answers "null" to every prompt, so a dry run renders a
    /// factsheet of `N/A` values.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.model.provider {
            ProviderKind::Mock => Ok(ModelClient::Mock(MockProvider::new("null"))),
            ProviderKind::OpenRouter | ProviderKind::OpenAi => Ok(ModelClient::Remote(
                OpenAiCompatibleProvider::new(config.provider_config())?,
            )),
        }
    }
}

impl LlmProvider for ModelClient {
    type Error = LlmError;

    fn generate(&self, prompt: &str, system: Option<&str>) -> std::result::Result<String, LlmError> {
        match self {
            ModelClient::Mock(provider) => provider.generate(prompt, system),
            ModelClient::Remote(provider) => provider.generate(prompt, system),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            ModelClient::Mock(provider) => provider.model_name(),
            ModelClient::Remote(provider) => provider.model_name(),
        }
    }
}

/// Result of a successful generate run
#[derive(Debug)]
pub struct GenerationReport {
    /// Extracted values and run metadata
    pub outcome: ExtractionOutcome,
    /// Where the factsheet was written
    pub output_path: PathBuf,
}

/// Wires the specification store, compiler, extractor and renderer together
pub struct Pipeline<S, L>
where
    S: SpecificationLoader<Error = PromptError>,
    L: LlmProvider,
{
    loader: S,
    reader: DocumentReader,
    compiler: PromptCompiler,
    extractor: Extractor<L>,
    renderer: TemplateRenderer,
}

impl Pipeline<DirectorySpecificationLoader, ModelClient> {
    /// Build a pipeline from resolved configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Pipeline::new(
            DirectorySpecificationLoader::new(&config.paths.prompt_dir),
            ModelClient::from_config(config)?,
            DocumentReader::new(config.document_limits()),
            config.extractor_config(),
        ))
    }
}

impl Pipeline<DirectorySpecificationLoader, MockProvider> {
    /// Pipeline for commands that make no model calls; needs no credentials
    pub fn offline(config: &Config) -> Self {
        Pipeline::new(
            DirectorySpecificationLoader::new(&config.paths.prompt_dir),
            MockProvider::new("null"),
            DocumentReader::new(config.document_limits()),
            config.extractor_config(),
        )
    }
}

impl<S, L> Pipeline<S, L>
where
    S: SpecificationLoader<Error = PromptError>,
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a pipeline from its parts
    pub fn new(loader: S, provider: L, reader: DocumentReader, extractor_config: ExtractorConfig) -> Self {
        Self {
            loader,
            reader,
            compiler: PromptCompiler::new(),
            extractor: Extractor::new(provider, extractor_config),
            renderer: TemplateRenderer::new(),
        }
    }

    /// The extractor, and through it the model provider
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }

    /// Load all specifications, sorted by name
    pub fn specifications(&self) -> Result<Vec<PromptSpecification>> {
        let mut specs: Vec<PromptSpecification> = self.loader.load()?.into_values().collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(specs)
    }

    /// Read the input document and compile one prompt per specification
    pub fn compile(&self, input: &Path) -> Result<Vec<CompiledPrompt>> {
        let text = self.reader.read(input)?;
        let specs = self.loader.load()?;
        info!("Compiling {} prompts for {}", specs.len(), input.display());
        Ok(self.compiler.compile(specs.values(), &text)?)
    }

    /// Compile and run every prompt against the model
    pub fn extract(&self, input: &Path) -> Result<ExtractionOutcome> {
        let prompts = self.compile(input)?;
        Ok(self.extractor.extract(&prompts)?)
    }

    /// Full run: extract, then render the record into `template` at `output`.
    ///
    /// The output directory is created if missing.
    pub fn generate(&self, input: &Path, template: &Path, output: &Path) -> Result<GenerationReport> {
        let outcome = self.extract(input)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.renderer.render(&render_record(&outcome), template, output)?;

        Ok(GenerationReport {
            outcome,
            output_path: output.to_path_buf(),
        })
    }
}

/// Record handed to the renderer: failed fields are bound to an empty
/// value so they display as `N/A` instead of breaking the template.
pub fn render_record(outcome: &ExtractionOutcome) -> ExtractionRecord {
    let mut record = outcome.record.clone();
    for failure in &outcome.failures {
        warn!(field = %failure.field, "Rendering failed field as N/A");
        record.insert(failure.field.as_str(), "");
    }
    record
}
