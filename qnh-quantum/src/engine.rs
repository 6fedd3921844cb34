//! Fachada do engine quântico
//!
//! Cada requisição cria seu próprio [`StateHandle`]; o engine guarda apenas
//! configuração imutável e a biblioteca de gates compartilhada, então pode ser
//! clonado entre threads sem lock.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitExecutor, CircuitOutcome, CircuitReport, GateHistory};
use crate::config::EngineConfig;
use crate::error::QuantumResult;
use crate::gates::{Gate, GateLibrary, standard_library};
use crate::measure::{self, Measurement};
use crate::models::{CircuitRequest, GateSpec, ReasoningRequest};
use crate::reasoning::{ReasoningEngine, ReasoningProblem, ReasoningResult};
use crate::state::StateVector;

/// Estado de uma requisição: vetor + histórico
#[derive(Debug, Clone, PartialEq)]
pub struct StateHandle {
    state: StateVector,
    history: GateHistory,
}

impl StateHandle {
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn history(&self) -> &GateHistory {
        &self.history
    }

    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    pub fn into_parts(self) -> (StateVector, GateHistory) {
        (self.state, self.history)
    }
}

/// Visão do estado para inspeção
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub num_qubits: usize,
    pub state_size: usize,
    pub probabilities: Vec<f64>,
    pub measurement: Measurement,
    pub gate_history: Vec<GateSpec>,
}

/// Status do engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub name: String,
    pub version: String,
    pub max_qubits: usize,
    pub tolerance: f64,
    pub gates: Vec<String>,
}

/// Engine quântico
#[derive(Debug, Clone)]
pub struct QuantumEngine {
    config: EngineConfig,
    executor: CircuitExecutor,
    reasoner: ReasoningEngine,
}

impl QuantumEngine {
    /// Engine com configuração padrão
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self::build(config, standard_library())
    }

    /// Engine com configuração customizada
    pub fn with_config(config: EngineConfig) -> QuantumResult<Self> {
        Self::with_library(config, standard_library())
    }

    /// Engine com biblioteca de gates customizada
    pub fn with_library(config: EngineConfig, library: Arc<GateLibrary>) -> QuantumResult<Self> {
        config.validate()?;
        Ok(Self::build(config, library))
    }

    fn build(config: EngineConfig, library: Arc<GateLibrary>) -> Self {
        let executor = CircuitExecutor::new(library, &config);
        let reasoner = ReasoningEngine::new(executor.clone(), config.max_qubits, config.tolerance);
        Self {
            config,
            executor,
            reasoner,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn executor(&self) -> &CircuitExecutor {
        &self.executor
    }

    /// Novo estado |0…0⟩
    pub fn initialize_state(&self, num_qubits: usize) -> QuantumResult<StateHandle> {
        let state = StateVector::new(num_qubits, self.config.max_qubits)?;
        tracing::debug!(num_qubits, "state initialized");
        Ok(StateHandle {
            state,
            history: GateHistory::new(),
        })
    }

    /// Aplica uma gate e retorna as novas probabilidades
    pub fn apply_gate(&self, handle: &mut StateHandle, spec: &GateSpec) -> QuantumResult<Vec<f64>> {
        let gate = Gate::from_spec(spec)?;
        self.executor.apply(&mut handle.state, &gate)?;
        handle.history.push(gate);
        Ok(handle.state.probabilities())
    }

    /// Executa um circuito sobre um estado existente, tudo ou nada
    pub fn run_circuit(&self, handle: &mut StateHandle, specs: &[GateSpec]) -> QuantumResult<()> {
        let gates = parse_gates(specs)?;
        self.executor
            .execute(&mut handle.state, &mut handle.history, &gates)
    }

    /// Simula a partir de |0…0⟩ e devolve estado final + histórico
    pub fn simulate_outcome(
        &self,
        num_qubits: usize,
        specs: &[GateSpec],
    ) -> QuantumResult<CircuitOutcome> {
        StateVector::check_dimension(num_qubits, self.config.max_qubits)?;
        let gates = parse_gates(specs)?;
        self.executor.simulate(num_qubits, &gates)
    }

    /// Relatório de um resultado, com o corte configurado
    pub fn report(&self, outcome: &CircuitOutcome) -> CircuitReport {
        CircuitReport::from_outcome(outcome, self.config.report_threshold)
    }

    /// Simula um circuito a partir de |0…0⟩
    pub fn simulate_circuit(
        &self,
        num_qubits: usize,
        specs: &[GateSpec],
    ) -> QuantumResult<CircuitReport> {
        let outcome = self.simulate_outcome(num_qubits, specs)?;

        let report = self.report(&outcome);
        tracing::info!(
            num_qubits,
            gates = outcome.history.len(),
            most_likely = report.most_likely.as_ref().map(|s| s.state.as_str()).unwrap_or("-"),
            "circuit simulated"
        );
        Ok(report)
    }

    /// [`simulate_circuit`](Self::simulate_circuit) a partir da requisição
    pub fn circuit_request(&self, request: &CircuitRequest) -> QuantumResult<CircuitReport> {
        self.simulate_circuit(request.num_qubits, &request.gates)
    }

    /// Mede o estado (sem colapsar)
    pub fn measure<R: Rng + ?Sized>(
        &self,
        handle: &StateHandle,
        rng: &mut R,
    ) -> QuantumResult<Measurement> {
        measure::sample(&handle.state, rng)
    }

    /// Snapshot com probabilidades, uma medição e o histórico
    pub fn snapshot<R: Rng + ?Sized>(
        &self,
        handle: &StateHandle,
        rng: &mut R,
    ) -> QuantumResult<StateSnapshot> {
        Ok(StateSnapshot {
            num_qubits: handle.num_qubits(),
            state_size: handle.state.dimension(),
            probabilities: handle.probabilities(),
            measurement: self.measure(handle, rng)?,
            gate_history: handle.history.to_specs(),
        })
    }

    /// Raciocínio por interferência
    pub fn apply_reasoning(
        &self,
        problem: &ReasoningProblem,
        options: &[String],
        weights: Option<&[f64]>,
    ) -> QuantumResult<ReasoningResult> {
        let result = self.reasoner.reason(problem, options, weights)?;
        tracing::info!(
            options = options.len(),
            most_likely = %result.most_likely.option,
            confidence = result.confidence,
            "reasoning applied"
        );
        Ok(result)
    }

    /// [`apply_reasoning`](Self::apply_reasoning) a partir da requisição
    pub fn reasoning_request(&self, request: &ReasoningRequest) -> QuantumResult<ReasoningResult> {
        self.apply_reasoning(&request.problem, &request.options, request.weights.as_deref())
    }

    /// Status do engine
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            name: "QuantumEngine".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_qubits: self.config.max_qubits,
            tolerance: self.config.tolerance,
            gates: self
                .executor
                .library()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for QuantumEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_gates(specs: &[GateSpec]) -> QuantumResult<Vec<Gate>> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| Gate::from_spec(spec).map_err(|e| e.at_gate(index, spec.kind.as_str())))
        .collect()
}
