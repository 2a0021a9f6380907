use typelattice::Variance;

use crate::diagnostics::{ConfigWarning, ValidationDiagnostics};
use crate::{LatticeConfig, LoggingConfig};

impl LatticeConfig {
    /// Check semantic invariants that deserialization cannot express.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_assignability(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_assignability(config: &LatticeConfig, out: &mut ValidationDiagnostics) {
    if config.assignability.variance == Variance::Invariant {
        out.warnings.push(ConfigWarning::InvariantTopLevelVariance {
            toml_path: "assignability.variance".to_string(),
        });
    }
}

fn validate_logging(config: &LatticeConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}
