use deriv_compute::symbolic::{simplify::SimplifyOptions, Differentiator, SymbolTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The notation results are rendered in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputFormat {
    /// Plain infix notation, such as `2*x*cos(x^2)`.
    #[default]
    Text,

    /// LaTeX math mode, such as `2 \cdot x \cdot \cos\left(x^{2}\right)`.
    Latex,
}

/// Configuration of a [`Calculator`](crate::Calculator).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// The classification of symbols into variables and constants.
    pub symbols: SymbolTable,

    /// Options passed to the simplifier.
    pub simplify: SimplifyOptions,

    /// The notation results are rendered in.
    pub output: OutputFormat,

    /// The number of most recent history entries included in an export.
    pub export_history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: SymbolTable::default(),
            simplify: SimplifyOptions::default(),
            output: OutputFormat::default(),
            export_history_limit: 5,
        }
    }
}

impl Config {
    /// Wraps the given [`Config`] into a builder for further customization.
    pub fn into_builder(self) -> ConfigBuilder {
        ConfigBuilder(self)
    }

    /// Creates a [`Differentiator`] that uses this configuration's symbols and simplifier
    /// options.
    pub fn differentiator(&self) -> Differentiator {
        Differentiator::new(self.symbols.clone(), self.simplify.clone())
    }
}

/// Helper struct to build a [`Config`] struct.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    /// Creates a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the classification of symbols.
    pub fn symbols(mut self, symbols: SymbolTable) -> Self {
        self.0.symbols = symbols;
        self
    }

    /// Sets the options passed to the simplifier.
    pub fn simplify(mut self, options: SimplifyOptions) -> Self {
        self.0.simplify = options;
        self
    }

    /// Sets the notation results are rendered in.
    pub fn output(mut self, output: OutputFormat) -> Self {
        self.0.output = output;
        self
    }

    /// Sets the number of history entries included in an export.
    pub fn export_history_limit(mut self, limit: usize) -> Self {
        self.0.export_history_limit = limit;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Config {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn builder() {
        let config = ConfigBuilder::new()
            .output(OutputFormat::Latex)
            .export_history_limit(2)
            .build();
        assert_eq!(config.output, OutputFormat::Latex);
        assert_eq!(config.export_history_limit, 2);
        assert_eq!(config.simplify, SimplifyOptions::default());

        let modified = config.clone().into_builder().output(OutputFormat::Text).build();
        assert_eq!(modified.output, OutputFormat::Text);
        assert_eq!(modified.export_history_limit, 2);
    }
}
