//! Configuração do engine
//!
//! Fontes, da menor para a maior precedência: padrões → arquivo TOML →
//! variáveis de ambiente (`QNH_*`). Flags de linha de comando ficam a cargo
//! do binário.
//!
//! ```toml
//! max_qubits = 16
//! tolerance = 1e-6
//! report_threshold = 0.001
//! seed = 42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuantumError, QuantumResult};

/// Tolerância para a invariante Σ|a|² = 1
pub const NORM_TOLERANCE: f64 = 1e-6;

/// Teto padrão de qubits (2^20 amplitudes ≈ 16 MiB)
pub const DEFAULT_MAX_QUBITS: usize = 20;

/// Teto absoluto aceito pela configuração (2^28 amplitudes ≈ 4 GiB)
pub const HARD_MAX_QUBITS: usize = 28;

/// Probabilidade mínima para um estado aparecer no relatório do circuito
pub const DEFAULT_REPORT_THRESHOLD: f64 = 0.001;

/// Configuração do engine quântico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Número máximo de qubits por estado
    ///
    /// Circuitos aceitam 1; o raciocínio usa ⌈log2 k⌉ + 1 qubits (ancila
    /// inclusa), então precisa de pelo menos 2 e falha com `ReasoningInput`
    /// abaixo disso.
    pub max_qubits: usize,
    /// Tolerância de normalização
    pub tolerance: f64,
    /// Corte de probabilidade do relatório de circuito
    pub report_threshold: f64,
    /// Seed padrão para amostragem reprodutível
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            tolerance: NORM_TOLERANCE,
            report_threshold: DEFAULT_REPORT_THRESHOLD,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Lê configuração de uma string TOML
    pub fn from_toml_str(source: &str) -> QuantumResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| QuantumError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Lê configuração de um arquivo TOML
    pub fn load(path: impl AsRef<Path>) -> QuantumResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| QuantumError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Padrões sobrepostos pelas variáveis de ambiente
    pub fn from_env() -> QuantumResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Aplica `QNH_MAX_QUBITS`, `QNH_TOLERANCE`, `QNH_REPORT_THRESHOLD` e `QNH_SEED`
    pub fn with_env_overrides(self) -> QuantumResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> QuantumResult<Self> {
        if let Some(value) = lookup("QNH_MAX_QUBITS") {
            self.max_qubits = parse_var("QNH_MAX_QUBITS", &value)?;
        }
        if let Some(value) = lookup("QNH_TOLERANCE") {
            self.tolerance = parse_var("QNH_TOLERANCE", &value)?;
        }
        if let Some(value) = lookup("QNH_REPORT_THRESHOLD") {
            self.report_threshold = parse_var("QNH_REPORT_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("QNH_SEED") {
            self.seed = Some(parse_var("QNH_SEED", &value)?);
        }
        self.validate()?;
        Ok(self)
    }

    /// Valida limites
    pub fn validate(&self) -> QuantumResult<()> {
        if self.max_qubits == 0 || self.max_qubits > HARD_MAX_QUBITS {
            return Err(QuantumError::Config(format!(
                "max_qubits must be in 1..={}, got {}",
                HARD_MAX_QUBITS, self.max_qubits
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(QuantumError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(0.0..1.0).contains(&self.report_threshold) {
            return Err(QuantumError::Config(format!(
                "report_threshold must be in [0, 1), got {}",
                self.report_threshold
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> QuantumResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| QuantumError::Config(format!("invalid value for {}: '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_qubits, 20);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = EngineConfig::from_toml_str("max_qubits = 12\nseed = 7\n").unwrap();
        assert_eq!(config.max_qubits, 12);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.tolerance, NORM_TOLERANCE);
    }

    #[test]
    fn test_from_toml_rejects_ceiling() {
        let err = EngineConfig::from_toml_str("max_qubits = 40").unwrap_err();
        assert!(matches!(err, QuantumError::Config(_)));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(EngineConfig::from_toml_str("max_qubits = \"many\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::default()
            .with_overrides(|key| match key {
                "QNH_MAX_QUBITS" => Some("8".into()),
                "QNH_SEED" => Some("99".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.max_qubits, 8);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_overrides_invalid_value() {
        let result = EngineConfig::default().with_overrides(|key| {
            (key == "QNH_TOLERANCE").then(|| "-1".to_string())
        });
        assert!(result.is_err());
    }
}
