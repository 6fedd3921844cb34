//! # Quantum Gates - Biblioteca de portas
//!
//! Catálogo de operadores unitários usados pelo executor de circuitos.
//!
//! ## Gates Implementadas
//!
//! - **Single-qubit**: I, H (Hadamard), X, Y, Z (Pauli), S, S†, T, T†
//! - **Two-qubit**: CNOT, CZ, SWAP
//! - **Rotation**: Rx, Ry, Rz, Phase (geradas a partir do ângulo)
//!
//! Gates controladas (CNOT, CZ ou qualquer gate com `controls`) guardam apenas
//! a matriz pequena do alvo; o executor aplica a condição de controle.

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4, PI};
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use once_cell::sync::Lazy;

use crate::error::{QuantumError, QuantumResult};
use crate::models::GateSpec;

/// Tolerância da checagem U·U† = I no registro
pub const UNITARY_TOLERANCE: f64 = 1e-10;

/// Ângulos usados para validar geradores no registro
const PROBE_ANGLES: [f64; 6] = [0.0, PI / 3.0, PI / 2.0, PI, -1.234, 2.0 * PI];

static STANDARD_LIBRARY: Lazy<Arc<GateLibrary>> = Lazy::new(|| {
    Arc::new(GateLibrary::standard().expect("standard gate matrices are unitary"))
});

/// Biblioteca padrão compartilhada pelo processo
pub fn standard_library() -> Arc<GateLibrary> {
    Arc::clone(&STANDARD_LIBRARY)
}

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

// =============================================================================
// Matrizes
// =============================================================================

/// Matriz unitária densa de 2^k × 2^k (k = número de qubits alvo)
#[derive(Clone, Debug, PartialEq)]
pub struct UnitaryMatrix {
    size: usize,
    /// Elementos em ordem de linha
    elements: Vec<Complex64>,
}

impl UnitaryMatrix {
    /// Cria matriz a partir das linhas
    pub fn from_rows(rows: Vec<Vec<Complex64>>) -> QuantumResult<Self> {
        let size = rows.len();
        if size < 2 || !size.is_power_of_two() || rows.iter().any(|r| r.len() != size) {
            return Err(QuantumError::Dimension(format!(
                "gate matrix must be square with power-of-two size, got {} rows",
                size
            )));
        }
        Ok(Self {
            size,
            elements: rows.into_iter().flatten().collect(),
        })
    }

    fn from_2x2(elements: [[Complex64; 2]; 2]) -> Self {
        let [[a, b], [c, d]] = elements;
        Self {
            size: 2,
            elements: vec![a, b, c, d],
        }
    }

    /// Identidade sobre `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut elements = vec![c(0.0, 0.0); size * size];
        for i in 0..size {
            elements[i * size + i] = c(1.0, 0.0);
        }
        Self { size, elements }
    }

    /// Dimensão da matriz
    pub fn size(&self) -> usize {
        self.size
    }

    /// Número de qubits em que atua
    pub fn num_qubits(&self) -> usize {
        self.size.trailing_zeros() as usize
    }

    /// Elemento (linha, coluna)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.elements[row * self.size + col]
    }

    /// Multiplicação de matrizes
    pub fn mul(&self, other: &UnitaryMatrix) -> UnitaryMatrix {
        let n = self.size;
        let mut elements = vec![c(0.0, 0.0); n * n];
        for i in 0..n {
            for j in 0..n {
                elements[i * n + j] = (0..n).map(|k| self.get(i, k) * other.get(k, j)).sum();
            }
        }
        UnitaryMatrix { size: n, elements }
    }

    /// Transposta conjugada (dagger)
    pub fn dagger(&self) -> UnitaryMatrix {
        let n = self.size;
        let mut elements = vec![c(0.0, 0.0); n * n];
        for i in 0..n {
            for j in 0..n {
                elements[j * n + i] = self.get(i, j).conj();
            }
        }
        UnitaryMatrix { size: n, elements }
    }

    /// Verifica U·U† = I
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let product = self.mul(&self.dagger());
        (0..self.size).all(|i| {
            (0..self.size).all(|j| {
                let expected = if i == j { c(1.0, 0.0) } else { c(0.0, 0.0) };
                (product.get(i, j) - expected).norm() < tolerance
            })
        })
    }

    /// Produto matriz-vetor sobre um bloco pequeno de amplitudes
    pub fn apply(&self, input: &[Complex64]) -> Vec<Complex64> {
        let mut output = vec![c(0.0, 0.0); self.size];
        self.apply_into(input, &mut output);
        output
    }

    /// Como [`apply`](Self::apply), escrevendo em `output` sem alocar
    #[inline]
    pub fn apply_into(&self, input: &[Complex64], output: &mut [Complex64]) {
        for (r, out) in output.iter_mut().enumerate().take(self.size) {
            *out = (0..self.size).map(|col| self.get(r, col) * input[col]).sum();
        }
    }
}

fn identity_matrix() -> UnitaryMatrix {
    UnitaryMatrix::identity(1)
}

fn pauli_x() -> UnitaryMatrix {
    UnitaryMatrix::from_2x2([[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]])
}

fn pauli_y() -> UnitaryMatrix {
    UnitaryMatrix::from_2x2([[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]])
}

fn pauli_z() -> UnitaryMatrix {
    UnitaryMatrix::from_2x2([[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]])
}

fn hadamard() -> UnitaryMatrix {
    let h = FRAC_1_SQRT_2;
    UnitaryMatrix::from_2x2([[c(h, 0.0), c(h, 0.0)], [c(h, 0.0), c(-h, 0.0)]])
}

fn phase_matrix(phi: f64) -> UnitaryMatrix {
    UnitaryMatrix::from_2x2([
        [c(1.0, 0.0), c(0.0, 0.0)],
        [c(0.0, 0.0), Complex64::from_polar(1.0, phi)],
    ])
}

fn swap_matrix() -> UnitaryMatrix {
    let mut m = UnitaryMatrix {
        size: 4,
        elements: vec![c(0.0, 0.0); 16],
    };
    for (row, col) in [(0, 0), (1, 2), (2, 1), (3, 3)] {
        m.elements[row * 4 + col] = c(1.0, 0.0);
    }
    m
}

fn rotation_x(params: &[f64]) -> UnitaryMatrix {
    let (s, cos) = (params[0] / 2.0).sin_cos();
    UnitaryMatrix::from_2x2([[c(cos, 0.0), c(0.0, -s)], [c(0.0, -s), c(cos, 0.0)]])
}

fn rotation_y(params: &[f64]) -> UnitaryMatrix {
    let (s, cos) = (params[0] / 2.0).sin_cos();
    UnitaryMatrix::from_2x2([[c(cos, 0.0), c(-s, 0.0)], [c(s, 0.0), c(cos, 0.0)]])
}

fn rotation_z(params: &[f64]) -> UnitaryMatrix {
    let half = params[0] / 2.0;
    UnitaryMatrix::from_2x2([
        [Complex64::from_polar(1.0, -half), c(0.0, 0.0)],
        [c(0.0, 0.0), Complex64::from_polar(1.0, half)],
    ])
}

fn phase_generator(params: &[f64]) -> UnitaryMatrix {
    phase_matrix(params[0])
}

// =============================================================================
// Tipos de gate
// =============================================================================

/// Tipo de gate com seus parâmetros
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateKind {
    Identity,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    Phase(f64),
    Cnot,
    Cz,
    Swap,
}

impl GateKind {
    /// Interpreta nome + parâmetros (aceita aliases, sem diferenciar caixa)
    pub fn parse(name: &str, params: &[f64]) -> QuantumResult<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let fixed = |kind: GateKind| -> QuantumResult<GateKind> {
            if params.is_empty() {
                Ok(kind)
            } else {
                Err(QuantumError::GateParameters {
                    gate: kind.name().to_string(),
                    reason: format!("expected no parameters, got {}", params.len()),
                })
            }
        };
        let angle = |build: fn(f64) -> GateKind, canonical: &str| -> QuantumResult<GateKind> {
            match params {
                [theta] if theta.is_finite() => Ok(build(*theta)),
                [theta] => Err(QuantumError::GateParameters {
                    gate: canonical.to_string(),
                    reason: format!("angle {} is not finite", theta),
                }),
                _ => Err(QuantumError::GateParameters {
                    gate: canonical.to_string(),
                    reason: format!("expected 1 angle, got {}", params.len()),
                }),
            }
        };

        match upper.as_str() {
            "I" | "ID" | "IDENTITY" => fixed(Self::Identity),
            "X" | "NOT" | "PAULIX" => fixed(Self::X),
            "Y" | "PAULIY" => fixed(Self::Y),
            "Z" | "PAULIZ" => fixed(Self::Z),
            "H" | "HADAMARD" => fixed(Self::H),
            "S" => fixed(Self::S),
            "SDG" => fixed(Self::Sdg),
            "T" => fixed(Self::T),
            "TDG" => fixed(Self::Tdg),
            "RX" => angle(Self::Rx, "RX"),
            "RY" => angle(Self::Ry, "RY"),
            "RZ" => angle(Self::Rz, "RZ"),
            "P" | "PHASE" => angle(Self::Phase, "PHASE"),
            "CNOT" | "CX" => fixed(Self::Cnot),
            "CZ" => fixed(Self::Cz),
            "SWAP" => fixed(Self::Swap),
            _ => Err(QuantumError::UnsupportedGate(name.to_string())),
        }
    }

    /// Nome canônico (chave da biblioteca)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "I",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::H => "H",
            Self::S => "S",
            Self::Sdg => "SDG",
            Self::T => "T",
            Self::Tdg => "TDG",
            Self::Rx(_) => "RX",
            Self::Ry(_) => "RY",
            Self::Rz(_) => "RZ",
            Self::Phase(_) => "PHASE",
            Self::Cnot => "CNOT",
            Self::Cz => "CZ",
            Self::Swap => "SWAP",
        }
    }

    /// Parâmetros numéricos
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Self::Rx(t) | Self::Ry(t) | Self::Rz(t) | Self::Phase(t) => vec![t],
            _ => Vec::new(),
        }
    }

    /// Número de qubits alvo
    pub fn target_arity(&self) -> usize {
        match self {
            Self::Swap => 2,
            _ => 1,
        }
    }

    /// Controles exigidos pelo próprio tipo
    pub fn required_controls(&self) -> usize {
        match self {
            Self::Cnot | Self::Cz => 1,
            _ => 0,
        }
    }

    /// Gate inversa
    pub fn inverse(&self) -> GateKind {
        match *self {
            Self::S => Self::Sdg,
            Self::Sdg => Self::S,
            Self::T => Self::Tdg,
            Self::Tdg => Self::T,
            Self::Rx(t) => Self::Rx(-t),
            Self::Ry(t) => Self::Ry(-t),
            Self::Rz(t) => Self::Rz(-t),
            Self::Phase(t) => Self::Phase(-t),
            other => other,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params().as_slice() {
            [theta] => write!(f, "{}({})", self.name(), theta),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Gate validada: tipo + qubits
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    kind: GateKind,
    targets: Vec<usize>,
    controls: Vec<usize>,
}

impl Gate {
    pub fn new(kind: GateKind, targets: Vec<usize>, controls: Vec<usize>) -> Self {
        Self {
            kind,
            targets,
            controls,
        }
    }

    pub fn h(qubit: usize) -> Self {
        Self::new(GateKind::H, vec![qubit], Vec::new())
    }

    pub fn x(qubit: usize) -> Self {
        Self::new(GateKind::X, vec![qubit], Vec::new())
    }

    pub fn z(qubit: usize) -> Self {
        Self::new(GateKind::Z, vec![qubit], Vec::new())
    }

    pub fn rx(qubit: usize, theta: f64) -> Self {
        Self::new(GateKind::Rx(theta), vec![qubit], Vec::new())
    }

    pub fn ry(qubit: usize, theta: f64) -> Self {
        Self::new(GateKind::Ry(theta), vec![qubit], Vec::new())
    }

    pub fn cnot(control: usize, target: usize) -> Self {
        Self::new(GateKind::Cnot, vec![target], vec![control])
    }

    pub fn swap(a: usize, b: usize) -> Self {
        Self::new(GateKind::Swap, vec![a, b], Vec::new())
    }

    /// Converte a forma de transporte
    ///
    /// CNOT/CZ sem `controls` e com dois alvos usam o primeiro como controle.
    pub fn from_spec(spec: &GateSpec) -> QuantumResult<Self> {
        let kind = GateKind::parse(&spec.kind, &spec.params)?;
        let implicit = kind.required_controls();

        if spec.controls.is_empty()
            && implicit > 0
            && spec.targets.len() == kind.target_arity() + implicit
        {
            let (controls, targets) = spec.targets.split_at(implicit);
            return Ok(Self::new(kind, targets.to_vec(), controls.to_vec()));
        }

        Ok(Self::new(kind, spec.targets.clone(), spec.controls.clone()))
    }

    /// Forma de transporte
    pub fn to_spec(&self) -> GateSpec {
        GateSpec {
            kind: self.kind.name().to_string(),
            targets: self.targets.clone(),
            controls: self.controls.clone(),
            params: self.kind.params(),
        }
    }

    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn controls(&self) -> &[usize] {
        &self.controls
    }

    /// Gate inversa sobre os mesmos qubits
    pub fn inverse(&self) -> Gate {
        Self::new(self.kind.inverse(), self.targets.clone(), self.controls.clone())
    }

    /// Valida aridade e índices contra um registrador de `num_qubits`
    pub fn validate(&self, num_qubits: usize) -> QuantumResult<()> {
        let name = self.kind.name();
        if self.targets.len() != self.kind.target_arity() {
            return Err(QuantumError::Dimension(format!(
                "{} expects {} target qubit(s), got {}",
                name,
                self.kind.target_arity(),
                self.targets.len()
            )));
        }
        if self.controls.len() < self.kind.required_controls() {
            return Err(QuantumError::Dimension(format!(
                "{} requires {} control qubit(s), got {}",
                name,
                self.kind.required_controls(),
                self.controls.len()
            )));
        }

        let mut seen = vec![false; num_qubits];
        for &qubit in self.targets.iter().chain(&self.controls) {
            if qubit >= num_qubits {
                return Err(QuantumError::Dimension(format!(
                    "{} references qubit {} outside [0, {})",
                    name, qubit, num_qubits
                )));
            }
            if seen[qubit] {
                return Err(QuantumError::Dimension(format!(
                    "{} references qubit {} more than once",
                    name, qubit
                )));
            }
            seen[qubit] = true;
        }
        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} t={:?}", self.kind, self.targets)?;
        if !self.controls.is_empty() {
            write!(f, " c={:?}", self.controls)?;
        }
        Ok(())
    }
}

// =============================================================================
// Biblioteca
// =============================================================================

/// Gerador de matriz a partir de parâmetros
pub type GateGenerator = fn(&[f64]) -> UnitaryMatrix;

#[derive(Clone)]
enum GateEntry {
    Fixed(UnitaryMatrix),
    Generator { params: usize, build: GateGenerator },
}

/// Catálogo nome → operador
#[derive(Clone, Default)]
pub struct GateLibrary {
    entries: BTreeMap<&'static str, GateEntry>,
}

impl fmt::Debug for GateLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateLibrary")
            .field("gates", &self.names())
            .finish()
    }
}

impl GateLibrary {
    /// Biblioteca vazia
    pub fn empty() -> Self {
        Self::default()
    }

    /// Biblioteca com todas as gates padrão
    pub fn standard() -> QuantumResult<Self> {
        let mut lib = Self::empty();
        lib.register_fixed("I", identity_matrix())?;
        lib.register_fixed("X", pauli_x())?;
        lib.register_fixed("Y", pauli_y())?;
        lib.register_fixed("Z", pauli_z())?;
        lib.register_fixed("H", hadamard())?;
        lib.register_fixed("S", phase_matrix(PI / 2.0))?;
        lib.register_fixed("SDG", phase_matrix(-PI / 2.0))?;
        lib.register_fixed("T", phase_matrix(FRAC_PI_4))?;
        lib.register_fixed("TDG", phase_matrix(-FRAC_PI_4))?;
        lib.register_fixed("CNOT", pauli_x())?;
        lib.register_fixed("CZ", pauli_z())?;
        lib.register_fixed("SWAP", swap_matrix())?;
        lib.register_generator("RX", 1, rotation_x)?;
        lib.register_generator("RY", 1, rotation_y)?;
        lib.register_generator("RZ", 1, rotation_z)?;
        lib.register_generator("PHASE", 1, phase_generator)?;
        Ok(lib)
    }

    /// Registra matriz fixa (validada unitária)
    pub fn register_fixed(&mut self, name: &'static str, matrix: UnitaryMatrix) -> QuantumResult<()> {
        if !matrix.is_unitary(UNITARY_TOLERANCE) {
            return Err(QuantumError::NonUnitary(name.to_string()));
        }
        self.entries.insert(name, GateEntry::Fixed(matrix));
        Ok(())
    }

    /// Registra gerador parametrizado (validado em ângulos de prova)
    pub fn register_generator(
        &mut self,
        name: &'static str,
        params: usize,
        build: GateGenerator,
    ) -> QuantumResult<()> {
        for &angle in &PROBE_ANGLES {
            let probe = vec![angle; params];
            if !build(&probe).is_unitary(UNITARY_TOLERANCE) {
                return Err(QuantumError::NonUnitary(format!("{}({})", name, angle)));
            }
        }
        self.entries.insert(name, GateEntry::Generator { params, build });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Nomes registrados, em ordem
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matriz de um tipo de gate
    pub fn matrix(&self, kind: &GateKind) -> QuantumResult<UnitaryMatrix> {
        match self.entries.get(kind.name()) {
            Some(GateEntry::Fixed(m)) => Ok(m.clone()),
            Some(GateEntry::Generator { params, build }) => {
                let values = kind.params();
                if values.len() != *params {
                    return Err(QuantumError::GateParameters {
                        gate: kind.name().to_string(),
                        reason: format!("expected {} parameter(s), got {}", params, values.len()),
                    });
                }
                Ok(build(&values))
            }
            None => Err(QuantumError::UnsupportedGate(kind.name().to_string())),
        }
    }
}

// =============================================================================
// Testes
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lib() -> Arc<GateLibrary> {
        standard_library()
    }

    #[test]
    fn test_standard_gates_unitary() {
        let lib = lib();
        for kind in [
            GateKind::Identity,
            GateKind::X,
            GateKind::Y,
            GateKind::Z,
            GateKind::H,
            GateKind::S,
            GateKind::Sdg,
            GateKind::T,
            GateKind::Tdg,
            GateKind::Rx(0.3),
            GateKind::Ry(-2.0),
            GateKind::Rz(PI),
            GateKind::Phase(1.0),
            GateKind::Cnot,
            GateKind::Cz,
            GateKind::Swap,
        ] {
            assert!(lib.matrix(&kind).unwrap().is_unitary(UNITARY_TOLERANCE), "{}", kind);
        }
    }

    #[test]
    fn test_register_rejects_non_unitary() {
        let mut lib = GateLibrary::empty();
        let bad = UnitaryMatrix::from_rows(vec![
            vec![c(1.0, 0.0), c(1.0, 0.0)],
            vec![c(0.0, 0.0), c(1.0, 0.0)],
        ])
        .unwrap();
        assert!(matches!(
            lib.register_fixed("BAD", bad),
            Err(QuantumError::NonUnitary(_))
        ));
        assert!(lib.is_empty());
    }

    #[test]
    fn test_register_rejects_bad_generator() {
        fn scaled(params: &[f64]) -> UnitaryMatrix {
            UnitaryMatrix::from_2x2([
                [c(params[0] + 1.0, 0.0), c(0.0, 0.0)],
                [c(0.0, 0.0), c(1.0, 0.0)],
            ])
        }
        let mut lib = GateLibrary::empty();
        assert!(lib.register_generator("SCALE", 1, scaled).is_err());
    }

    #[test]
    fn test_lookup_missing_in_custom_library() {
        let mut lib = GateLibrary::empty();
        lib.register_fixed("H", hadamard()).unwrap();
        assert!(lib.matrix(&GateKind::H).is_ok());
        assert!(matches!(
            lib.matrix(&GateKind::X),
            Err(QuantumError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(GateKind::parse("h", &[]).unwrap(), GateKind::H);
        assert_eq!(GateKind::parse("NOT", &[]).unwrap(), GateKind::X);
        assert_eq!(GateKind::parse("cx", &[]).unwrap(), GateKind::Cnot);
        assert_eq!(GateKind::parse("p", &[0.5]).unwrap(), GateKind::Phase(0.5));
        assert_eq!(GateKind::parse("Rx", &[1.0]).unwrap(), GateKind::Rx(1.0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            GateKind::parse("BOGUS", &[]),
            Err(QuantumError::UnsupportedGate(_))
        ));
        assert!(matches!(
            GateKind::parse("RX", &[]),
            Err(QuantumError::GateParameters { .. })
        ));
        assert!(matches!(
            GateKind::parse("RY", &[f64::NAN]),
            Err(QuantumError::GateParameters { .. })
        ));
        assert!(matches!(
            GateKind::parse("H", &[1.0]),
            Err(QuantumError::GateParameters { .. })
        ));
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let lib = lib();
        for kind in [
            GateKind::S,
            GateKind::T,
            GateKind::H,
            GateKind::Rx(0.7),
            GateKind::Ry(1.1),
            GateKind::Rz(-0.4),
            GateKind::Phase(2.5),
            GateKind::Swap,
        ] {
            let m = lib.matrix(&kind).unwrap();
            let inv = lib.matrix(&kind.inverse()).unwrap();
            let product = m.mul(&inv);
            let id = UnitaryMatrix::identity(m.num_qubits());
            for i in 0..m.size() {
                for j in 0..m.size() {
                    assert!((product.get(i, j) - id.get(i, j)).norm() < 1e-10, "{}", kind);
                }
            }
        }
    }

    #[test]
    fn test_s_squared_is_z() {
        let lib = lib();
        let s = lib.matrix(&GateKind::S).unwrap();
        let s2 = s.mul(&s);
        let z = lib.matrix(&GateKind::Z).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert!((s2.get(i, j) - z.get(i, j)).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn test_hadamard_creates_superposition() {
        let h = hadamard();
        let out = h.apply(&[c(1.0, 0.0), c(0.0, 0.0)]);
        assert!((out[0].re - FRAC_1_SQRT_2).abs() < 1e-10);
        assert!((out[1].re - FRAC_1_SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_gate_from_spec_implicit_control() {
        let gate = Gate::from_spec(&GateSpec::new("CNOT", vec![0, 1])).unwrap();
        assert_eq!(gate.controls(), &[0]);
        assert_eq!(gate.targets(), &[1]);

        let explicit =
            Gate::from_spec(&GateSpec::new("CNOT", vec![1]).with_controls(vec![0])).unwrap();
        assert_eq!(gate, explicit);
    }

    #[test]
    fn test_gate_spec_roundtrip() {
        let gate = Gate::rx(2, 0.25);
        let spec = gate.to_spec();
        assert_eq!(spec.kind, "RX");
        assert_eq!(spec.params, vec![0.25]);
        assert_eq!(Gate::from_spec(&spec).unwrap(), gate);
    }

    #[test]
    fn test_gate_validate() {
        assert!(Gate::h(0).validate(1).is_ok());
        assert!(Gate::h(1).validate(1).is_err());
        assert!(Gate::cnot(0, 0).validate(2).is_err());
        assert!(Gate::new(GateKind::Cnot, vec![1], vec![]).validate(2).is_err());
        assert!(Gate::new(GateKind::H, vec![0, 1], vec![]).validate(2).is_err());
        assert!(Gate::swap(0, 1).validate(2).is_ok());
        assert!(Gate::new(GateKind::X, vec![2], vec![0, 1]).validate(3).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(GateKind::H.to_string(), "H");
        assert_eq!(GateKind::Rz(0.5).to_string(), "RZ(0.5)");
        assert_eq!(Gate::cnot(0, 1).to_string(), "CNOT t=[1] c=[0]");
    }
}
