//! Specification module - declarative extraction prompts and their compiled form

/// Name of the single placeholder an input template may reference.
///
/// It is bound to the source document's text at compile time.
pub const INPUT_PLACEHOLDER: &str = "input_text";

/// One declarative definition of how to extract one field
///
/// The `name` doubles as the output field key, so it must be unique across
/// a loaded set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpecification {
    /// Unique identifier, derived from the storage key (e.g. file stem)
    pub name: String,

    /// Extraction persona / task framing
    pub role: String,

    /// Background the model should consider
    pub context: String,

    /// What must be extracted
    pub extraction_fields: String,

    /// Rules appended as bullet points, in order
    pub constraints: Vec<String>,

    /// Template with exactly one placeholder bound to the document text
    pub input_template: String,
}

impl PromptSpecification {
    /// Names of the sub-fields that are missing or blank.
    ///
    /// An empty result means the specification can be compiled.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.role.trim().is_empty() {
            missing.push("role");
        }
        if self.context.trim().is_empty() {
            missing.push("context");
        }
        if self.extraction_fields.trim().is_empty() {
            missing.push("extraction_fields");
        }
        if self.constraints.is_empty() || self.constraints.iter().any(|c| c.trim().is_empty()) {
            missing.push("constraints");
        }
        if self.input_template.trim().is_empty() {
            missing.push("input_template");
        }

        missing
    }

    /// Check whether every required sub-field is present
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// A fully assembled, self-contained instruction for one field
///
/// Immutable once built: no further substitution happens after compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt {
    field_name: String,
    instruction: String,
}

impl CompiledPrompt {
    /// Create a compiled prompt
    pub fn new(field_name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            instruction: instruction.into(),
        }
    }

    /// The field this prompt extracts
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The instruction text submitted to the model
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PromptSpecification {
        PromptSpecification {
            name: "s1_study_phase".to_string(),
            role: "You extract the study phase.".to_string(),
            context: "Clinical trial synopsis.".to_string(),
            extraction_fields: "The phase of the study.".to_string(),
            constraints: vec!["Answer in one word".to_string()],
            input_template: "Text: {{input_text}}".to_string(),
        }
    }

    #[test]
    fn test_complete_specification() {
        assert!(spec().is_complete());
        assert!(spec().missing_fields().is_empty());
    }

    #[test]
    fn test_blank_fields_are_reported() {
        let mut s = spec();
        s.role = "   ".to_string();
        s.input_template = String::new();
        assert_eq!(s.missing_fields(), vec!["role", "input_template"]);
    }

    #[test]
    fn test_empty_constraint_list_is_missing() {
        let mut s = spec();
        s.constraints.clear();
        assert_eq!(s.missing_fields(), vec!["constraints"]);

        s.constraints = vec!["ok".to_string(), "".to_string()];
        assert_eq!(s.missing_fields(), vec!["constraints"]);
    }

    #[test]
    fn test_compiled_prompt_accessors() {
        let prompt = CompiledPrompt::new("phase", "Extract the phase");
        assert_eq!(prompt.field_name(), "phase");
        assert_eq!(prompt.instruction(), "Extract the phase");
    }
}
