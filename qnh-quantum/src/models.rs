//! Modelos de requisição/resposta do engine
//!
//! Os nomes de campo seguem o contrato consumido pela camada HTTP e pelo
//! dashboard (`type`, `targets`, `numQubits`, ...).

use serde::{Deserialize, Serialize};

use crate::reasoning::ReasoningProblem;

// ============================================================================
// Request Models
// ============================================================================

/// Gate na forma de transporte
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    /// Nome do gate (`"H"`, `"CNOT"`, `"RX"`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Qubits alvo, em ordem
    pub targets: Vec<usize>,

    /// Qubits de controle (todos precisam estar em |1⟩)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<usize>,

    /// Parâmetros reais (ângulos)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl GateSpec {
    pub fn new(kind: impl Into<String>, targets: Vec<usize>) -> Self {
        Self {
            kind: kind.into(),
            targets,
            controls: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn with_controls(mut self, controls: Vec<usize>) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }
}

/// Requisição de simulação de circuito
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitRequest {
    #[serde(rename = "numQubits", alias = "num_qubits")]
    pub num_qubits: usize,

    #[serde(default)]
    pub gates: Vec<GateSpec>,
}

/// Requisição de raciocínio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningRequest {
    /// Descrição do problema e restrições
    #[serde(default)]
    pub problem: ReasoningProblem,

    /// Opções a avaliar
    pub options: Vec<String>,

    /// Pesos iniciais, paralelos às opções
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_spec_wire_names() {
        let spec: GateSpec =
            serde_json::from_str(r#"{"type":"CNOT","targets":[1],"controls":[0]}"#).unwrap();
        assert_eq!(spec.kind, "CNOT");
        assert_eq!(spec.targets, vec![1]);
        assert_eq!(spec.controls, vec![0]);
        assert!(spec.params.is_empty());

        let json = serde_json::to_string(&GateSpec::new("H", vec![0])).unwrap();
        assert_eq!(json, r#"{"type":"H","targets":[0]}"#);
    }

    #[test]
    fn test_circuit_request_accepts_both_spellings() {
        let a: CircuitRequest = serde_json::from_str(r#"{"numQubits":2,"gates":[]}"#).unwrap();
        let b: CircuitRequest = serde_json::from_str(r#"{"num_qubits":2}"#).unwrap();
        assert_eq!(a.num_qubits, 2);
        assert_eq!(b.num_qubits, 2);
        assert!(b.gates.is_empty());
    }

    #[test]
    fn test_reasoning_request_defaults() {
        let req: ReasoningRequest =
            serde_json::from_str(r#"{"options":["A","B"]}"#).unwrap();
        assert_eq!(req.options.len(), 2);
        assert!(req.weights.is_none());
        assert!(req.problem.constraints.is_empty());
    }
}
