use crate::interpreter::interpreter::Scoping;

/// Knobs for a new interpreter. `reset` goes back to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Scoping mode at startup and after `reset`.
    pub scoping: Scoping,
    /// How many code blocks may be running inside each other before the
    /// innermost one fails with a recursion error.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scoping: Scoping::Dynamic,
            max_depth: Config::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn with_scoping(mut self, scoping: Scoping) -> Self {
        self.scoping = scoping;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Defaults overridden by `PSREPL_SCOPING` (`dynamic` or `lexical`) and
    /// `PSREPL_MAX_DEPTH`. Bad values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(raw) = lookup("PSREPL_SCOPING") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "dynamic" => config.scoping = Scoping::Dynamic,
                "lexical" => config.scoping = Scoping::Lexical,
                _ => tracing::warn!(value = %raw, "ignoring unknown PSREPL_SCOPING"),
            }
        }

        if let Some(raw) = lookup("PSREPL_MAX_DEPTH") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_depth = n,
                _ => tracing::warn!(value = %raw, "ignoring invalid PSREPL_MAX_DEPTH"),
            }
        }

        config
    }
}
