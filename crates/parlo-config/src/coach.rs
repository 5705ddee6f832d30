use serde::Deserialize;

/// Coaching behavior configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoachConfig {
    /// Prompt policy controlling how much the model may add
    #[serde(default)]
    pub policy: PromptPolicy,
}

/// How far beyond the literal transcript the model may go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptPolicy {
    /// The model must not introduce facts absent from the transcript
    Strict,
    /// The model suggests structural, stylistic, and content additions
    #[default]
    Proactive,
}
