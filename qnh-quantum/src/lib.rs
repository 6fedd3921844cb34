//! # ⚛️ qnh-quantum - State-Vector Engine
//!
//! Simulação de vetor de estado para n qubits: gates unitárias, amostragem de
//! medições e raciocínio por interferência para ranquear opções de decisão.
//!
//! ## Computational Complexity
//!
//! **Gate application O(2^n × 2^k)**
//! - n = qubits do registrador, k = qubits alvo da gate (1 ou 2)
//! - A matriz 2^n × 2^n nunca é materializada
//!
//! **Measurement O(2^n)**
//! - Tabela de pesos montada uma vez por chamada; cada sorteio é O(log 2^n)
//!
//! **Reasoning O(k)**
//! - k opções ocupam ⌈log2 k⌉ + 1 qubits (a ancila de interferência)
//!
//! **Memory:** 16 bytes × 2^n. O teto de qubits é checado antes de alocar.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          QuantumEngine                          │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  CircuitExecutor ◄── GateLibrary          │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Sampler (measure)                        │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  ReasoningEngine                          │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//!              │ StateHandle (um por requisição)
//!              ▼
//!          StateVector + GateHistory
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use qnh_quantum::{GateSpec, QuantumEngine};
//!
//! let engine = QuantumEngine::new();
//! let report = engine
//!     .simulate_circuit(
//!         2,
//!         &[
//!             GateSpec::new("H", vec![0]),
//!             GateSpec::new("CNOT", vec![1]).with_controls(vec![0]),
//!         ],
//!     )
//!     .unwrap();
//!
//! assert_eq!(report.states.len(), 2);
//! ```

pub mod circuit;
pub mod config;
pub mod engine;
pub mod error;
pub mod gates;
pub mod measure;
pub mod models;
pub mod reasoning;
pub mod state;

pub use circuit::{BasisProbability, CircuitExecutor, CircuitOutcome, CircuitReport, GateHistory};
pub use config::{EngineConfig, DEFAULT_MAX_QUBITS, HARD_MAX_QUBITS, NORM_TOLERANCE};
pub use engine::{EngineStatus, QuantumEngine, StateHandle, StateSnapshot};
pub use error::{ErrorKind, QuantumError, QuantumResult};
pub use gates::{Gate, GateKind, GateLibrary, UnitaryMatrix, standard_library};
pub use measure::{Measurement, Sampler, sample, sample_counts};
pub use models::{CircuitRequest, GateSpec, ReasoningRequest};
pub use reasoning::{
    Constraint, OptionRef, RankedOption, ReasoningEngine, ReasoningProblem, ReasoningResult,
    penalty_phase,
};
pub use state::StateVector;
