//! Tipos de erro para qnh-quantum

use thiserror::Error;

/// Resultado customizado para operações quânticas
pub type QuantumResult<T> = Result<T, QuantumError>;

/// Classe do erro, usada por camadas externas para mapear respostas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Dimension,
    UnsupportedGate,
    GateParameters,
    NonUnitary,
    Normalization,
    ReasoningInput,
    Config,
}

/// Erros que podem ocorrer em operações quânticas
#[derive(Debug, Clone, Error)]
pub enum QuantumError {
    #[error("Dimension error: {0}")]
    Dimension(String),

    #[error("Unsupported gate: '{0}'")]
    UnsupportedGate(String),

    #[error("Invalid parameters for gate '{gate}': {reason}")]
    GateParameters { gate: String, reason: String },

    #[error("Gate '{0}' is not unitary")]
    NonUnitary(String),

    #[error("Normalization error: total probability {0} cannot be rescaled")]
    Normalization(f64),

    #[error("Invalid reasoning input: {0}")]
    ReasoningInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Gate #{index} ({gate}): {source}")]
    AtGate {
        index: usize,
        gate: String,
        #[source]
        source: Box<QuantumError>,
    },
}

impl QuantumError {
    /// Anexa a posição do gate ao erro
    pub fn at_gate(self, index: usize, gate: impl Into<String>) -> Self {
        Self::AtGate {
            index,
            gate: gate.into(),
            source: Box::new(self),
        }
    }

    /// Classe do erro, atravessando `AtGate`
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Dimension(_) => ErrorKind::Dimension,
            Self::UnsupportedGate(_) => ErrorKind::UnsupportedGate,
            Self::GateParameters { .. } => ErrorKind::GateParameters,
            Self::NonUnitary(_) => ErrorKind::NonUnitary,
            Self::Normalization(_) => ErrorKind::Normalization,
            Self::ReasoningInput(_) => ErrorKind::ReasoningInput,
            Self::Config(_) => ErrorKind::Config,
            Self::AtGate { source, .. } => source.kind(),
        }
    }

    /// Índice do gate que falhou, se houver
    pub fn gate_index(&self) -> Option<usize> {
        match self {
            Self::AtGate { index, .. } => Some(*index),
            _ => None,
        }
    }
}
