//! Compiles specifications into model-ready instructions

use crate::error::PromptError;
use factsheet_domain::{CompiledPrompt, PromptSpecification, INPUT_PLACEHOLDER};
use minijinja::{context, Environment, UndefinedBehavior};
use tracing::{debug, error};

/// Header introducing the extraction task section
pub const EXTRACTION_HEADER: &str = "EXTRACTION TASKS:";

/// Header introducing the constraint list
pub const CONSTRAINTS_HEADER: &str = "CONSTRAINTS:";

/// Renders specifications against a document into [`CompiledPrompt`]s
///
/// Compilation is pure: no I/O, no side effects beyond logging.
pub struct PromptCompiler {
    env: Environment<'static>,
}

impl PromptCompiler {
    /// Create a compiler with strict placeholder checking
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Compile every specification against the document text.
    ///
    /// Output is ordered by specification name (ascending), whatever the
    /// iteration order of `specs`. That order becomes the population order
    /// of the extraction record.
    pub fn compile<'a, I>(&self, specs: I, document_text: &str) -> Result<Vec<CompiledPrompt>, PromptError>
    where
        I: IntoIterator<Item = &'a PromptSpecification>,
    {
        let mut ordered: Vec<&PromptSpecification> = specs.into_iter().collect();
        ordered.sort_by(|a, b| a.name.cmp(&b.name));

        ordered
            .into_iter()
            .map(|spec| self.compile_one(spec, document_text))
            .collect()
    }

    /// Compile a single specification
    pub fn compile_one(
        &self,
        spec: &PromptSpecification,
        document_text: &str,
    ) -> Result<CompiledPrompt, PromptError> {
        let missing = spec.missing_fields();
        if !missing.is_empty() {
            error!(spec = %spec.name, "Specification is incomplete: {}", missing.join(", "));
            return Err(PromptError::malformed(
                &spec.name,
                format!("missing or empty field(s): {}", missing.join(", ")),
            ));
        }

        let rendered_input = self.render_input(spec, document_text)?;

        let instruction = format!(
            "{}\n\n{}\n\n{}\n{}\n\n{}\n{}\n\n{}",
            spec.role.trim(),
            spec.context.trim(),
            EXTRACTION_HEADER,
            spec.extraction_fields.trim(),
            CONSTRAINTS_HEADER,
            format_constraints(&spec.constraints),
            rendered_input,
        );

        debug!(spec = %spec.name, "Compiled prompt ({} chars)", instruction.trim().len());
        Ok(CompiledPrompt::new(spec.name.clone(), instruction.trim()))
    }

    /// Render the input template with the document text bound to its placeholder
    pub fn render_input(&self, spec: &PromptSpecification, document_text: &str) -> Result<String, PromptError> {
        let template = self
            .env
            .template_from_str(&spec.input_template)
            .map_err(|e| self.fail(spec, e))?;

        let variables = template.undeclared_variables(false);
        if !variables.contains(INPUT_PLACEHOLDER) {
            return Err(self.fail(
                spec,
                format!("no {{{{ {} }}}} placeholder", INPUT_PLACEHOLDER),
            ));
        }

        let mut unknown: Vec<String> = variables
            .into_iter()
            .filter(|name| name != INPUT_PLACEHOLDER)
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(self.fail(
                spec,
                format!("unknown placeholder(s): {}", unknown.join(", ")),
            ));
        }

        template
            .render(context! { input_text => document_text })
            .map_err(|e| self.fail(spec, e))
    }

    fn fail(&self, spec: &PromptSpecification, reason: impl std::fmt::Display) -> PromptError {
        error!(spec = %spec.name, "Input template failed to render: {}", reason);
        PromptError::render(&spec.name, reason)
    }
}

impl Default for PromptCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Format constraints as a bullet list, one `- ` item per line
pub fn format_constraints(constraints: &[String]) -> String {
    constraints
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn spec(name: &str) -> PromptSpecification {
        PromptSpecification {
            name: name.to_string(),
            role: "extract study phase".to_string(),
            context: "The text is a clinical trial synopsis.".to_string(),
            extraction_fields: "Study phase".to_string(),
            constraints: vec!["Answer in one word".to_string()],
            input_template: "Text: {{input_text}}".to_string(),
        }
    }

    #[test]
    fn test_compile_contains_document_and_constraints() {
        let compiler = PromptCompiler::new();
        let prompt = compiler
            .compile_one(&spec("phase"), "This is a Phase I study.")
            .unwrap();

        assert_eq!(prompt.field_name(), "phase");
        assert!(prompt.instruction().contains("Text: This is a Phase I study."));
        assert!(prompt.instruction().contains("- Answer in one word"));
    }

    #[test]
    fn test_section_order() {
        let compiler = PromptCompiler::new();
        let mut s = spec("phase");
        s.role = "  ROLE  ".to_string();
        s.context = "\nCONTEXT\n".to_string();
        s.extraction_fields = "FIELDS".to_string();
        s.constraints = vec!["first".to_string(), "second".to_string()];
        s.input_template = "INPUT {{ input_text }}\n".to_string();

        let prompt = compiler.compile_one(&s, "doc").unwrap();
        assert_eq!(
            prompt.instruction(),
            "ROLE\n\nCONTEXT\n\nEXTRACTION TASKS:\nFIELDS\n\nCONSTRAINTS:\n- first\n- second\n\nINPUT doc"
        );
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let compiler = PromptCompiler::new();
        let mut s = spec("phase");
        s.input_template = "Text: {{ input_text }} {{ sponsor }}".to_string();

        let err = compiler.compile_one(&s, "doc").unwrap_err();
        match err {
            PromptError::TemplateRender { name, reason } => {
                assert_eq!(name, "phase");
                assert!(reason.contains("sponsor"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_placeholder_fails() {
        let compiler = PromptCompiler::new();
        let mut s = spec("phase");
        s.input_template = "Text: none here".to_string();

        let err = compiler.compile_one(&s, "This is a Phase I study.").unwrap_err();
        match err {
            PromptError::TemplateRender { name, reason } => {
                assert_eq!(name, "phase");
                assert!(reason.contains("input_text"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_document_text_is_not_escaped() {
        let compiler = PromptCompiler::new();
        let prompt = compiler.compile_one(&spec("phase"), "<b>A & B</b>").unwrap();
        assert!(prompt.instruction().contains("Text: <b>A & B</b>"));
    }

    #[test]
    fn test_incomplete_specification_fails() {
        let compiler = PromptCompiler::new();
        let mut s = spec("phase");
        s.constraints.clear();

        let err = compiler.compile_one(&s, "doc").unwrap_err();
        assert!(matches!(err, PromptError::MalformedSpecification { .. }));
    }

    #[test]
    fn test_compile_sorts_by_name() {
        let mut specs = HashMap::new();
        for name in ["s1_study_phase", "s0_study_title", "s1_participant_bmi"] {
            specs.insert(name.to_string(), spec(name));
        }

        let prompts = PromptCompiler::new().compile(specs.values(), "doc").unwrap();
        let names: Vec<_> = prompts.iter().map(|p| p.field_name()).collect();
        assert_eq!(names, vec!["s0_study_title", "s1_participant_bmi", "s1_study_phase"]);
    }

    #[test]
    fn test_format_constraints() {
        let constraints = vec!["one".to_string(), " two ".to_string()];
        assert_eq!(format_constraints(&constraints), "- one\n-  two ");
        assert_eq!(format_constraints(&[]), "");
    }

    proptest! {
        #[test]
        fn prop_compiled_prompt_contains_inputs(
            document in "[a-zA-Z0-9 .,]{1,80}",
            constraints in proptest::collection::vec("[a-zA-Z][a-zA-Z ]{0,30}[a-zA-Z]", 1..5),
        ) {
            let mut s = spec("field");
            s.constraints = constraints.clone();
            let prompt = PromptCompiler::new().compile_one(&s, &document).unwrap();
            let text = prompt.instruction();

            prop_assert!(!text.is_empty());
            prop_assert!(text.contains(document.trim()));

            // Bullets appear in input order
            let mut cursor = 0;
            for c in &constraints {
                let bullet = format!("- {}", c);
                let found = text[cursor..].find(&bullet);
                prop_assert!(found.is_some());
                cursor += found.unwrap() + bullet.len();
            }
        }
    }
}
