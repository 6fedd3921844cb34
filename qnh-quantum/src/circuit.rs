//! Executor de circuitos
//!
//! Aplica uma lista ordenada de gates sobre um [`StateVector`]. A execução é
//! transacional: trabalha numa cópia e só publica estado e histórico se todas
//! as gates forem aplicadas.
//!
//! ## Embedding
//!
//! Uma gate de k alvos nunca é expandida para 2^n × 2^n. Para cada índice base
//! com os bits alvo zerados (e os bits de controle em 1), as 2^k amplitudes que
//! diferem só nos bits alvo são multiplicadas pela matriz pequena:
//!
//! ```text
//! custo = O(2^n · 2^k)
//! ```

use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{QuantumError, QuantumResult};
use crate::gates::{Gate, GateLibrary, UnitaryMatrix, standard_library};
use crate::models::GateSpec;
use crate::state::StateVector;

/// Histórico de gates aplicadas (somente anexação)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateHistory {
    entries: Vec<Gate>,
}

impl GateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, gate: Gate) {
        self.entries.push(gate);
    }

    pub fn entries(&self) -> &[Gate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Forma de transporte, em ordem de aplicação
    pub fn to_specs(&self) -> Vec<GateSpec> {
        self.entries.iter().map(Gate::to_spec).collect()
    }
}

/// Resultado de uma simulação
#[derive(Debug, Clone)]
pub struct CircuitOutcome {
    pub state: StateVector,
    pub history: GateHistory,
}

/// Estado da base com sua probabilidade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisProbability {
    /// Bitstring com o qubit 0 primeiro
    pub state: String,
    pub index: usize,
    pub probability: f64,
}

/// Relatório de circuito para consumidores externos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitReport {
    pub num_qubits: usize,
    /// Amplitudes como pares `[re, im]`
    pub amplitudes: Vec<[f64; 2]>,
    pub probabilities: Vec<f64>,
    pub gate_history: Vec<GateSpec>,
    /// Estados acima do corte, por probabilidade decrescente
    pub states: Vec<BasisProbability>,
    pub most_likely: Option<BasisProbability>,
}

impl CircuitReport {
    pub fn from_outcome(outcome: &CircuitOutcome, threshold: f64) -> Self {
        let state = &outcome.state;
        let probabilities = state.probabilities();

        let mut states: Vec<BasisProbability> = probabilities
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > threshold)
            .map(|(index, &probability)| BasisProbability {
                state: state.bitstring(index),
                index,
                probability,
            })
            .collect();
        // sort estável: empates ficam em ordem de índice
        states.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        Self {
            num_qubits: state.num_qubits(),
            amplitudes: state.amplitudes().iter().map(|a| [a.re, a.im]).collect(),
            probabilities,
            gate_history: outcome.history.to_specs(),
            most_likely: states.first().cloned(),
            states,
        }
    }
}

/// Executor sequencial de circuitos
#[derive(Debug, Clone)]
pub struct CircuitExecutor {
    library: Arc<GateLibrary>,
    max_qubits: usize,
    tolerance: f64,
}

impl Default for CircuitExecutor {
    fn default() -> Self {
        Self::new(standard_library(), &EngineConfig::default())
    }
}

impl CircuitExecutor {
    pub fn new(library: Arc<GateLibrary>, config: &EngineConfig) -> Self {
        Self {
            library,
            max_qubits: config.max_qubits,
            tolerance: config.tolerance,
        }
    }

    pub fn library(&self) -> &GateLibrary {
        &self.library
    }

    /// Aplica uma gate no lugar (não transacional)
    ///
    /// A gate é resolvida e validada antes de qualquer escrita, então um erro
    /// deixa `state` intacto.
    pub fn apply(&self, state: &mut StateVector, gate: &Gate) -> QuantumResult<()> {
        let matrix = self.library.matrix(gate.kind())?;
        gate.validate(state.num_qubits())?;
        if matrix.num_qubits() != gate.targets().len() {
            return Err(QuantumError::Dimension(format!(
                "{} matrix acts on {} qubit(s) but {} target(s) were given",
                gate.kind().name(),
                matrix.num_qubits(),
                gate.targets().len()
            )));
        }

        apply_unitary(state, &matrix, gate.targets(), gate.controls());
        state.enforce_normalization(self.tolerance)?;
        tracing::debug!(gate = %gate, "gate applied");
        Ok(())
    }

    /// Executa `gates` em ordem sobre `state`, tudo ou nada
    pub fn execute(
        &self,
        state: &mut StateVector,
        history: &mut GateHistory,
        gates: &[Gate],
    ) -> QuantumResult<()> {
        let mut scratch = state.clone();
        let mut applied = Vec::with_capacity(gates.len());

        for (index, gate) in gates.iter().enumerate() {
            if let Err(e) = self.apply(&mut scratch, gate) {
                tracing::debug!(index, gate = %gate, error = %e, "circuit aborted");
                return Err(e.at_gate(index, gate.kind().name()));
            }
            applied.push(gate.clone());
        }

        *state = scratch;
        for gate in applied {
            history.push(gate);
        }
        Ok(())
    }

    /// Simula um circuito a partir de |0…0⟩
    pub fn simulate(&self, num_qubits: usize, gates: &[Gate]) -> QuantumResult<CircuitOutcome> {
        let mut state = StateVector::new(num_qubits, self.max_qubits)?;
        let mut history = GateHistory::new();
        self.execute(&mut state, &mut history, gates)?;

        tracing::debug!(
            num_qubits,
            gates = history.len(),
            "circuit simulated"
        );
        Ok(CircuitOutcome { state, history })
    }

    /// Reexecuta um histórico a partir de |0…0⟩
    pub fn replay(&self, num_qubits: usize, history: &GateHistory) -> QuantumResult<CircuitOutcome> {
        self.simulate(num_qubits, history.entries())
    }
}

/// Aplica `matrix` nos `targets` condicionada aos `controls`
fn apply_unitary(
    state: &mut StateVector,
    matrix: &UnitaryMatrix,
    targets: &[usize],
    controls: &[usize],
) {
    let target_masks: Vec<usize> = targets.iter().map(|&q| state.qubit_mask(q)).collect();
    let target_mask = target_masks.iter().fold(0, |acc, m| acc | m);
    let control_mask = controls.iter().fold(0, |acc, &q| acc | state.qubit_mask(q));

    let k = targets.len();
    let size = 1usize << k;
    let mut indices = vec![0usize; size];
    let mut block = vec![Complex64::new(0.0, 0.0); size];
    let mut product = vec![Complex64::new(0.0, 0.0); size];

    let amplitudes = state.amplitudes_mut();
    for base in 0..amplitudes.len() {
        if base & target_mask != 0 || base & control_mask != control_mask {
            continue;
        }

        // sub-índice s: bit (k-1-j) de s ↔ targets[j]
        for s in 0..size {
            let mut idx = base;
            for (j, mask) in target_masks.iter().enumerate() {
                if s & (1 << (k - 1 - j)) != 0 {
                    idx |= mask;
                }
            }
            indices[s] = idx;
            block[s] = amplitudes[idx];
        }

        matrix.apply_into(&block, &mut product);
        for (&idx, &amp) in indices.iter().zip(&product) {
            amplitudes[idx] = amp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::GateKind;
    use std::f64::consts::PI;

    fn executor() -> CircuitExecutor {
        CircuitExecutor::default()
    }

    fn assert_probs(state: &StateVector, expected: &[f64]) {
        let probs = state.probabilities();
        assert_eq!(probs.len(), expected.len());
        for (i, (p, e)) in probs.iter().zip(expected).enumerate() {
            assert!((p - e).abs() < 1e-9, "index {}: {} != {}", i, p, e);
        }
    }

    #[test]
    fn test_hadamard_single_qubit() {
        let out = executor().simulate(1, &[Gate::h(0)]).unwrap();
        assert_probs(&out.state, &[0.5, 0.5]);
        assert_eq!(out.history.len(), 1);
    }

    #[test]
    fn test_bell_state() {
        let out = executor()
            .simulate(2, &[Gate::h(0), Gate::cnot(0, 1)])
            .unwrap();
        assert_probs(&out.state, &[0.5, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_x_on_qubit_zero_sets_msb() {
        let out = executor().simulate(3, &[Gate::x(0)]).unwrap();
        assert_eq!(out.state.probabilities()[0b100], 1.0);
    }

    #[test]
    fn test_control_on_zero_is_noop() {
        let out = executor().simulate(2, &[Gate::cnot(0, 1)]).unwrap();
        assert_probs(&out.state, &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_swap_moves_excitation() {
        let out = executor()
            .simulate(3, &[Gate::x(0), Gate::swap(0, 2)])
            .unwrap();
        assert_eq!(out.state.probabilities()[0b001], 1.0);
    }

    #[test]
    fn test_toffoli_via_two_controls() {
        let toffoli = Gate::new(GateKind::X, vec![2], vec![0, 1]);
        let out = executor()
            .simulate(3, &[Gate::x(0), Gate::x(1), toffoli.clone()])
            .unwrap();
        assert_eq!(out.state.probabilities()[0b111], 1.0);

        let out = executor().simulate(3, &[Gate::x(0), toffoli]).unwrap();
        assert_eq!(out.state.probabilities()[0b100], 1.0);
    }

    #[test]
    fn test_hzh_is_x() {
        let out = executor()
            .simulate(1, &[Gate::h(0), Gate::z(0), Gate::h(0)])
            .unwrap();
        assert_probs(&out.state, &[0.0, 1.0]);
    }

    #[test]
    fn test_ry_pi_flips() {
        let out = executor().simulate(1, &[Gate::ry(0, PI)]).unwrap();
        assert_probs(&out.state, &[0.0, 1.0]);
    }

    #[test]
    fn test_execute_is_transactional() {
        let exec = executor();
        let mut state = StateVector::new(2, 20).unwrap();
        let mut history = GateHistory::new();
        exec.execute(&mut state, &mut history, &[Gate::h(0)]).unwrap();
        let before = state.clone();

        let err = exec
            .execute(
                &mut state,
                &mut history,
                &[Gate::x(1), Gate::h(5), Gate::x(0)],
            )
            .unwrap_err();

        assert_eq!(err.gate_index(), Some(1));
        assert_eq!(state, before);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_replay_reproduces_state() {
        let exec = executor();
        let out = exec
            .simulate(2, &[Gate::h(0), Gate::cnot(0, 1), Gate::rx(1, 0.3)])
            .unwrap();
        let again = exec.replay(2, &out.history).unwrap();
        assert_eq!(again.state, out.state);
        assert_eq!(again.history, out.history);
    }

    #[test]
    fn test_report_sorted_and_filtered() {
        let out = executor()
            .simulate(2, &[Gate::ry(0, 2.0 * (0.8f64).sqrt().acos()), Gate::h(1)])
            .unwrap();
        let report = CircuitReport::from_outcome(&out, 0.001);

        assert_eq!(report.num_qubits, 2);
        assert_eq!(report.states.len(), 4);
        assert!(report
            .states
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
        let top = report.most_likely.unwrap();
        assert_eq!(top.state, "00");
        assert!((top.probability - 0.4).abs() < 1e-9);
        assert_eq!(report.gate_history.len(), 2);
    }

    #[test]
    fn test_report_drops_zero_states() {
        let out = executor().simulate(2, &[Gate::h(0), Gate::cnot(0, 1)]).unwrap();
        let report = CircuitReport::from_outcome(&out, 0.001);
        let names: Vec<_> = report.states.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(names, vec!["00", "11"]);
    }

    #[test]
    fn test_embedding_matches_full_matrix() {
        let exec = executor();
        let prep = [Gate::h(0), Gate::ry(1, 0.9), Gate::new(GateKind::T, vec![1], vec![])];

        for gate in [Gate::swap(0, 1), Gate::rx(0, 1.3), Gate::ry(1, -0.4)] {
            let before = exec.simulate(2, &prep).unwrap().state;
            let mut after = before.clone();
            exec.apply(&mut after, &gate).unwrap();

            // operador completo: U ⊗ I ou I ⊗ U conforme o alvo
            let small = exec.library().matrix(gate.kind()).unwrap();
            let full = match (small.num_qubits(), gate.targets()[0]) {
                (2, _) => small,
                (_, 0) => kron(&small, &UnitaryMatrix::identity(1)),
                _ => kron(&UnitaryMatrix::identity(1), &small),
            };
            let expected = full.apply(before.amplitudes());
            for (a, e) in after.amplitudes().iter().zip(&expected) {
                assert!((a - e).norm() < 1e-12, "{}", gate);
            }
        }
    }

    fn kron(a: &UnitaryMatrix, b: &UnitaryMatrix) -> UnitaryMatrix {
        let (n, m) = (a.size(), b.size());
        let rows = (0..n * m)
            .map(|r| {
                (0..n * m)
                    .map(|col| a.get(r / m, col / m) * b.get(r % m, col % m))
                    .collect()
            })
            .collect();
        UnitaryMatrix::from_rows(rows).unwrap()
    }
}
