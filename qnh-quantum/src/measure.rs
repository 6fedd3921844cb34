//! Amostragem de medições
//!
//! Sorteia um estado da base segundo |a_i|². O vetor nunca é colapsado: cada
//! chamada é um sorteio i.i.d. da mesma distribuição.

use std::collections::BTreeMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{QuantumError, QuantumResult};
use crate::state::StateVector;

/// Resultado de uma medição
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Bitstring com o qubit 0 primeiro
    pub bitstring: String,
    pub index: usize,
    /// Probabilidade teórica do resultado sorteado
    pub probability: f64,
}

fn distribution(state: &StateVector) -> QuantumResult<(Vec<f64>, WeightedIndex<f64>)> {
    let probabilities = state.probabilities();
    let dist = WeightedIndex::new(&probabilities)
        .map_err(|_| QuantumError::Normalization(state.total_probability()))?;
    Ok((probabilities, dist))
}

/// Sorteia um resultado de `state`
pub fn sample<R: Rng + ?Sized>(state: &StateVector, rng: &mut R) -> QuantumResult<Measurement> {
    let (probabilities, dist) = distribution(state)?;
    let index = dist.sample(rng);
    Ok(Measurement {
        bitstring: state.bitstring(index),
        index,
        probability: probabilities[index],
    })
}

/// Histograma de `shots` sorteios, por bitstring
pub fn sample_counts<R: Rng + ?Sized>(
    state: &StateVector,
    shots: usize,
    rng: &mut R,
) -> QuantumResult<BTreeMap<String, usize>> {
    let (_, dist) = distribution(state)?;
    let mut counts = BTreeMap::new();
    for _ in 0..shots {
        let index = dist.sample(rng);
        *counts.entry(state.bitstring(index)).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Amostrador com RNG próprio
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// RNG determinístico
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// RNG a partir da entropia do sistema
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed opcional: determinístico se presente
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    pub fn measure(&mut self, state: &StateVector) -> QuantumResult<Measurement> {
        sample(state, &mut self.rng)
    }

    pub fn counts(
        &mut self,
        state: &StateVector,
        shots: usize,
    ) -> QuantumResult<BTreeMap<String, usize>> {
        sample_counts(state, shots, &mut self.rng)
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
