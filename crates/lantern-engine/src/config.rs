//! Engine configuration.

/// Default score penalty for being reincarnated.
pub const DEFAULT_REINCARNATION_PENALTY: u32 = 10;

/// Minimum similarity for "did you mean" suggestions (0.0-1.0).
pub const DEFAULT_SUGGESTION_THRESHOLD: f64 = 0.8;

/// Settings for a [`GameSession`](crate::GameSession).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Start with full location descriptions on every visit.
    pub verbose: bool,
    /// Start immune to death.
    pub immune: bool,
    /// Joins the text fragments of one turn.
    pub separator: String,
    /// Points lost on reincarnation.
    pub reincarnation_penalty: u32,
    /// Similarity needed before an unknown verb gets a suggestion.
    pub suggestion_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            immune: false,
            separator: "\n".to_string(),
            reincarnation_penalty: DEFAULT_REINCARNATION_PENALTY,
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose descriptions.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set immunity.
    pub fn with_immune(mut self, immune: bool) -> Self {
        self.immune = immune;
        self
    }

    /// Set the fragment separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the reincarnation penalty.
    pub fn with_reincarnation_penalty(mut self, penalty: u32) -> Self {
        self.reincarnation_penalty = penalty;
        self
    }

    /// Set the suggestion threshold, clamped to 0.0-1.0.
    pub fn with_suggestion_threshold(mut self, threshold: f64) -> Self {
        self.suggestion_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}
