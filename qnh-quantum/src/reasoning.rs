//! # Raciocínio por interferência
//!
//! Ranqueia opções de decisão codificando seus pesos como amplitudes e
//! aplicando penalidades de restrição como fase.
//!
//! ## Pipeline
//!
//! ```text
//! pesos w_i ──► |ψ⟩ = Σ √w_i |0, i⟩          (ancila = qubit 0)
//!          H(ancila)
//!          oráculo: |1, i⟩ → e^{iφ_i} |1, i⟩
//!          H(ancila)
//!          ramo ancila=0: a_i (1 + e^{iφ_i}) / 2
//! ```
//!
//! A probabilidade de cada opção antes da renormalização é
//! `w_i · cos²(φ_i / 2)`, com `φ_i = π · p_i / (1 + p_i)` para a penalidade
//! acumulada `p_i ≥ 0`. Penalidade zero não altera a opção; penalidade
//! crescente cancela a amplitude consigo mesma, sem nunca ficar negativa.

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::circuit::CircuitExecutor;
use crate::config::EngineConfig;
use crate::error::{QuantumError, QuantumResult};
use crate::gates::Gate;
use crate::state::StateVector;

/// Resolução usada para considerar probabilidades empatadas
pub const RANK_TOLERANCE: f64 = 1e-9;

/// Massa mínima do ramo ancila=0 para ainda ranquear
const MIN_BRANCH_MASS: f64 = 1e-300;

/// Referência a uma opção: posição ou rótulo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionRef {
    Index(usize),
    Label(String),
}

impl OptionRef {
    fn resolve(&self, options: &[String]) -> QuantumResult<usize> {
        match self {
            Self::Index(i) if *i < options.len() => Ok(*i),
            Self::Index(i) => Err(QuantumError::ReasoningInput(format!(
                "constraint references option #{} but only {} options exist",
                i,
                options.len()
            ))),
            Self::Label(label) => options.iter().position(|o| o == label).ok_or_else(|| {
                QuantumError::ReasoningInput(format!(
                    "constraint references unknown option '{}'",
                    label
                ))
            }),
        }
    }
}

/// Restrição do problema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Penalidade estrutural sobre uma opção
    Penalize { option: OptionRef, penalty: f64 },
    /// Conflito entre duas opções; cada uma paga `penalty` × peso da outra
    Exclusive {
        a: OptionRef,
        b: OptionRef,
        penalty: f64,
    },
    /// Abate penalidade acumulada de uma opção (mínimo zero)
    Prefer { option: OptionRef, boost: f64 },
}

/// Problema de decisão
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReasoningProblem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub constraints: Vec<Constraint>,

    /// Dados opacos do chamador, preservados
    #[serde(flatten)]
    pub context: serde_json::Map<String, serde_json::Value>,
}

impl ReasoningProblem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Opção ranqueada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOption {
    pub option: String,
    pub probability: f64,
}

/// Resultado do raciocínio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult {
    /// Opções por probabilidade decrescente
    pub ranked_options: Vec<RankedOption>,
    pub most_likely: RankedOption,
    /// Probabilidade da opção mais provável
    pub confidence: f64,
    /// Qubits usados (opções + ancila)
    pub num_qubits: usize,
}

/// Mapeia penalidade ≥ 0 para fase em [0, π)
pub fn penalty_phase(penalty: f64) -> f64 {
    PI * penalty / (1.0 + penalty)
}

/// Engine de raciocínio
#[derive(Debug, Clone)]
pub struct ReasoningEngine {
    executor: CircuitExecutor,
    max_qubits: usize,
    tolerance: f64,
}

impl Default for ReasoningEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self::new(CircuitExecutor::default(), config.max_qubits, config.tolerance)
    }
}

impl ReasoningEngine {
    pub fn new(executor: CircuitExecutor, max_qubits: usize, tolerance: f64) -> Self {
        Self {
            executor,
            max_qubits,
            tolerance,
        }
    }

    /// Ranqueia `options` sob as restrições de `problem`
    pub fn reason(
        &self,
        problem: &ReasoningProblem,
        options: &[String],
        weights: Option<&[f64]>,
    ) -> QuantumResult<ReasoningResult> {
        let weights = normalized_weights(options, weights)?;
        let penalties = accumulate_penalties(problem, options, &weights)?;

        let k = options.len();
        let option_qubits = (usize::BITS - (k - 1).leading_zeros()).max(1) as usize;
        let num_qubits = option_qubits + 1;
        StateVector::check_dimension(num_qubits, self.max_qubits).map_err(|_| {
            QuantumError::ReasoningInput(format!(
                "{} options need {} qubits, ceiling is {}",
                k, num_qubits, self.max_qubits
            ))
        })?;

        // codificação: ancila (qubit 0, bit mais significativo) em |0⟩
        let dimension = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dimension];
        for (amp, w) in amplitudes.iter_mut().zip(&weights) {
            *amp = Complex64::new(w.sqrt(), 0.0);
        }
        let mut state = StateVector::from_amplitudes(amplitudes, self.tolerance)?;

        // interferência
        let ancilla = 1usize << option_qubits;
        let mut phases = vec![0.0; dimension];
        for (i, &p) in penalties.iter().enumerate() {
            phases[ancilla | i] = penalty_phase(p);
        }
        self.executor.apply(&mut state, &Gate::h(0))?;
        state.apply_diagonal(&phases)?;
        self.executor.apply(&mut state, &Gate::h(0))?;

        // colapso para ranking: ramo ancila=0
        let branch: Vec<f64> = state.probabilities()[..k].to_vec();
        let mass: f64 = branch.iter().sum();
        if !(mass > MIN_BRANCH_MASS) {
            return Err(QuantumError::ReasoningInput(
                "constraints suppress every option".to_string(),
            ));
        }

        let mut ranked: Vec<(usize, f64)> = branch
            .iter()
            .enumerate()
            .map(|(i, &p)| (i, p / mass))
            .collect();
        ranked.sort_by_key(|&(_, p)| std::cmp::Reverse((p / RANK_TOLERANCE).round() as i64));

        let ranked_options: Vec<RankedOption> = ranked
            .into_iter()
            .map(|(i, probability)| RankedOption {
                option: options[i].clone(),
                probability,
            })
            .collect();
        let most_likely = ranked_options[0].clone();

        tracing::debug!(
            options = k,
            constraints = problem.constraints.len(),
            top = %most_likely.option,
            confidence = most_likely.probability,
            "reasoning completed"
        );

        Ok(ReasoningResult {
            confidence: most_likely.probability,
            most_likely,
            ranked_options,
            num_qubits,
        })
    }
}

fn normalized_weights(options: &[String], weights: Option<&[f64]>) -> QuantumResult<Vec<f64>> {
    if options.is_empty() {
        return Err(QuantumError::ReasoningInput("options list is empty".to_string()));
    }

    let Some(weights) = weights else {
        return Ok(vec![1.0 / options.len() as f64; options.len()]);
    };

    if weights.len() != options.len() {
        return Err(QuantumError::ReasoningInput(format!(
            "{} weights for {} options",
            weights.len(),
            options.len()
        )));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(QuantumError::ReasoningInput(format!(
            "weights must be finite and non-negative, got {}",
            w
        )));
    }

    // escala pelo maior peso: a soma fica em [1, k] e não estoura
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return Err(QuantumError::ReasoningInput(
            "weights sum to zero".to_string(),
        ));
    }
    let scaled: Vec<f64> = weights.iter().map(|w| w / max).collect();
    let sum: f64 = scaled.iter().sum();
    Ok(scaled.iter().map(|w| w / sum).collect())
}

fn check_amount(name: &str, value: f64) -> QuantumResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(QuantumError::ReasoningInput(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )))
    }
}

fn accumulate_penalties(
    problem: &ReasoningProblem,
    options: &[String],
    weights: &[f64],
) -> QuantumResult<Vec<f64>> {
    let mut penalties = vec![0.0; options.len()];
    let mut boosts = vec![0.0; options.len()];

    for constraint in &problem.constraints {
        match constraint {
            Constraint::Penalize { option, penalty } => {
                let i = option.resolve(options)?;
                penalties[i] += check_amount("penalty", *penalty)?;
            }
            Constraint::Exclusive { a, b, penalty } => {
                let (i, j) = (a.resolve(options)?, b.resolve(options)?);
                if i == j {
                    return Err(QuantumError::ReasoningInput(format!(
                        "exclusive constraint pairs option '{}' with itself",
                        options[i]
                    )));
                }
                let penalty = check_amount("penalty", *penalty)?;
                penalties[i] += penalty * weights[j];
                penalties[j] += penalty * weights[i];
            }
            Constraint::Prefer { option, boost } => {
                let i = option.resolve(options)?;
                boosts[i] += check_amount("boost", *boost)?;
            }
        }
    }

    Ok(penalties
        .iter()
        .zip(&boosts)
        .map(|(p, b)| (p - b).max(0.0))
        .collect())
}
