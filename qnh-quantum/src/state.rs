//! Vetor de amplitudes complexas
//!
//! Um estado de `n` qubits guarda `2^n` amplitudes. O índice é o estado da
//! base computacional com o qubit 0 no bit mais significativo:
//!
//! ```text
//! n = 3, índice 0b011  →  |q0 q1 q2⟩ = |0 1 1⟩
//! ```

use num_complex::Complex64;

use crate::error::{QuantumError, QuantumResult};

/// Vetor de estado de `n` qubits
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl StateVector {
    /// Cria |0…0⟩ com `num_qubits` qubits
    ///
    /// O teto é checado antes de alocar.
    pub fn new(num_qubits: usize, max_qubits: usize) -> QuantumResult<Self> {
        Self::check_dimension(num_qubits, max_qubits)?;

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Admissão: `0 < num_qubits <= max_qubits`
    pub fn check_dimension(num_qubits: usize, max_qubits: usize) -> QuantumResult<()> {
        if num_qubits == 0 {
            return Err(QuantumError::Dimension(
                "qubit count must be positive".to_string(),
            ));
        }
        if num_qubits > max_qubits {
            return Err(QuantumError::Dimension(format!(
                "{} qubits exceeds the configured ceiling of {}",
                num_qubits, max_qubits
            )));
        }
        Ok(())
    }

    /// Cria estado a partir de amplitudes já normalizadas
    pub fn from_amplitudes(amplitudes: Vec<Complex64>, tolerance: f64) -> QuantumResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QuantumError::Dimension(format!(
                "amplitude count must be a power of two >= 2, got {}",
                len
            )));
        }

        let state = Self {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        };
        let total = state.total_probability();
        if !total.is_finite() || (total - 1.0).abs() > tolerance {
            return Err(QuantumError::Normalization(total));
        }
        Ok(state)
    }

    /// Número de qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimensão (2^n)
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitudes
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude de um estado da base
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Máscara do bit que representa `qubit`
    pub(crate) fn qubit_mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    /// |a_i|² para cada índice
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Σ|a_i|²
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Verifica normalização dentro da tolerância
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.total_probability() - 1.0).abs() <= tolerance
    }

    /// Reescala por 1/√(Σ|a|²)
    pub fn renormalize(&mut self) -> QuantumResult<()> {
        let total = self.total_probability();
        if !total.is_finite() || total <= f64::MIN_POSITIVE {
            return Err(QuantumError::Normalization(total));
        }

        let scale = 1.0 / total.sqrt();
        for amp in &mut self.amplitudes {
            *amp *= scale;
        }
        Ok(())
    }

    /// Corrige deriva numérica acima da tolerância
    ///
    /// Retorna `true` se foi preciso renormalizar.
    pub fn enforce_normalization(&mut self, tolerance: f64) -> QuantumResult<bool> {
        let total = self.total_probability();
        if (total - 1.0).abs() <= tolerance {
            return Ok(false);
        }

        tracing::warn!(
            total_probability = total,
            tolerance,
            "normalization drift detected, renormalizing"
        );
        self.renormalize()?;
        Ok(true)
    }

    /// Índice como bitstring de `n` caracteres (qubit 0 primeiro)
    pub fn bitstring(&self, index: usize) -> String {
        format!("{:0width$b}", index, width = self.num_qubits)
    }

    /// Fidelidade |⟨self|other⟩|²
    pub fn fidelity(&self, other: &StateVector) -> Option<f64> {
        if self.dimension() != other.dimension() {
            return None;
        }
        let inner: Complex64 = self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum();
        Some(inner.norm_sqr())
    }

    /// Aplica a unitária diagonal diag(e^{iφ_0}, …, e^{iφ_{2^n-1}})
    pub fn apply_diagonal(&mut self, phases: &[f64]) -> QuantumResult<()> {
        if phases.len() != self.dimension() {
            return Err(QuantumError::Dimension(format!(
                "diagonal has {} phases for a state of dimension {}",
                phases.len(),
                self.dimension()
            )));
        }
        if let Some(bad) = phases.iter().find(|p| !p.is_finite()) {
            return Err(QuantumError::GateParameters {
                gate: "diagonal".to_string(),
                reason: format!("phase {} is not finite", bad),
            });
        }

        for (amp, &phi) in self.amplitudes.iter_mut().zip(phases) {
            if phi != 0.0 {
                *amp *= Complex64::from_polar(1.0, phi);
            }
        }
        Ok(())
    }
}
