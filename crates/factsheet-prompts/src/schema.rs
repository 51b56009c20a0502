//! YAML schema for specification files

use crate::error::PromptError;
use factsheet_domain::{PromptSpecification, INPUT_PLACEHOLDER};
use minijinja::Environment;
use serde::Deserialize;

/// Top-level layout of a specification file
#[derive(Debug, Deserialize)]
struct SpecificationDocument {
    prompt_config: Option<PromptConfig>,
    input_template: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptConfig {
    role: Option<String>,
    context: Option<String>,
    extraction_fields: Option<String>,
    constraints: Option<Vec<String>>,
}

/// Parse and validate one specification.
///
/// `name` is the storage key (file stem) and becomes the specification's
/// name. Every required sub-field is checked here so a broken file is
/// reported at load time, not when it is first compiled.
pub fn parse_specification(name: &str, source: &str) -> Result<PromptSpecification, PromptError> {
    let document: SpecificationDocument = serde_yaml::from_str(source)
        .map_err(|e| PromptError::malformed(name, format!("invalid YAML: {}", e)))?;

    let config = document
        .prompt_config
        .ok_or_else(|| PromptError::malformed(name, "missing section 'prompt_config'"))?;

    let spec = PromptSpecification {
        name: name.to_string(),
        role: config.role.unwrap_or_default(),
        context: config.context.unwrap_or_default(),
        extraction_fields: config.extraction_fields.unwrap_or_default(),
        constraints: config.constraints.unwrap_or_default(),
        input_template: document.input_template.unwrap_or_default(),
    };

    let missing = spec.missing_fields();
    if !missing.is_empty() {
        return Err(PromptError::malformed(
            name,
            format!("missing or empty field(s): {}", missing.join(", ")),
        ));
    }

    // Unknown placeholders are rejected when compiling
    let env = Environment::new();
    let template = env
        .template_from_str(&spec.input_template)
        .map_err(|e| PromptError::malformed(name, format!("invalid input_template: {}", e)))?;
    if !template.undeclared_variables(false).contains(INPUT_PLACEHOLDER) {
        return Err(PromptError::malformed(
            name,
            format!("input_template has no {{{{ {} }}}} placeholder", INPUT_PLACEHOLDER),
        ));
    }

    Ok(spec)
}
