use regex::Regex;

use crate::app_config::TransformRule;
use crate::errors::TranslationError;

/// Compiled regex rewrite applied to whole segment texts
#[derive(Debug, Clone)]
pub struct TextTransform {
    pattern: Regex,
    replacement: String,
}

impl TextTransform {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, TranslationError> {
        let regex = Regex::new(pattern).map_err(|e| TranslationError::InvalidTransform {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: regex,
            replacement: replacement.to_string(),
        })
    }

    pub fn from_rule(rule: &TransformRule) -> Result<Self, TranslationError> {
        Self::new(&rule.pattern, &rule.replacement)
    }

    /// Compile rules, keeping their order
    pub fn compile_all(rules: &[TransformRule]) -> Result<Vec<Self>, TranslationError> {
        rules.iter().map(Self::from_rule).collect()
    }

    /// Replace every match; `$1`-style group references are expanded
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

/// Apply `transforms` in order
pub fn apply_all(transforms: &[TextTransform], text: &str) -> String {
    transforms
        .iter()
        .fold(text.to_string(), |acc, t| t.apply(&acc))
}
