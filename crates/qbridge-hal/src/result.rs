//! Simulation results.
//!
//! Engines store amplitudes little-endian: qubit `k` is bit `k` of the
//! basis index. Callers choose the order they read results in with
//! [`BasisOrder`].

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use qbridge_ir::{Clbit, Qubit};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Ordering of qubits in basis-state indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasisOrder {
    /// Increasing lexicographic order: the first qubit is the most
    /// significant bit.
    #[default]
    Ilo,
    /// Decreasing lexicographic order: the first qubit is the least
    /// significant bit.
    Dlo,
}

/// Output of one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResult {
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    state: Option<Array1<Complex64>>,
    density_matrix: Option<Array2<Complex64>>,
    bits: Vec<Option<bool>>,
}

/// Map a little-endian index to `order`.
fn reindex(index: usize, n_qubits: usize, order: BasisOrder) -> usize {
    match order {
        BasisOrder::Dlo => index,
        BasisOrder::Ilo if n_qubits == 0 => index,
        BasisOrder::Ilo => index.reverse_bits() >> (usize::BITS as usize - n_qubits),
    }
}

impl BackendResult {
    /// A pure-state result. `state[i]` is little-endian over `qubits`.
    pub fn from_state(qubits: Vec<Qubit>, state: Array1<Complex64>) -> Self {
        Self {
            qubits,
            clbits: vec![],
            state: Some(state),
            density_matrix: None,
            bits: vec![],
        }
    }

    /// A density-matrix result, little-endian over `qubits` on both axes.
    pub fn from_density_matrix(qubits: Vec<Qubit>, density_matrix: Array2<Complex64>) -> Self {
        Self {
            qubits,
            clbits: vec![],
            state: None,
            density_matrix: Some(density_matrix),
            bits: vec![],
        }
    }

    /// Attach classical bit values; `None` marks a bit no measurement wrote.
    #[must_use]
    pub fn with_bits(mut self, clbits: Vec<Clbit>, bits: Vec<Option<bool>>) -> Self {
        self.clbits = clbits;
        self.bits = bits;
        self
    }

    /// Qubits, in the order that defines the basis.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Classical bits.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Value of each classical bit.
    pub fn bits(&self) -> &[Option<bool>] {
        &self.bits
    }

    /// True if the result holds a state vector.
    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    /// True if the result holds a density matrix.
    pub fn has_density_matrix(&self) -> bool {
        self.density_matrix.is_some()
    }

    /// The state vector in `order`.
    pub fn get_state(&self, order: BasisOrder) -> HalResult<Array1<Complex64>> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| HalError::ResultUnavailable("result holds no state vector".into()))?;
        let n = self.num_qubits();
        let mut out = Array1::zeros(state.len());
        for (i, amp) in state.iter().enumerate() {
            out[reindex(i, n, order)] = *amp;
        }
        Ok(out)
    }

    /// The density matrix in `order`.
    pub fn get_density_matrix(&self, order: BasisOrder) -> HalResult<Array2<Complex64>> {
        let rho = self
            .density_matrix
            .as_ref()
            .ok_or_else(|| HalError::ResultUnavailable("result holds no density matrix".into()))?;
        let n = self.num_qubits();
        let mut out = Array2::zeros(rho.raw_dim());
        for ((i, j), z) in rho.indexed_iter() {
            out[[reindex(i, n, order), reindex(j, n, order)]] = *z;
        }
        Ok(out)
    }

    /// Probability of every basis state in `order`.
    pub fn probabilities(&self, order: BasisOrder) -> HalResult<Vec<f64>> {
        let probs: Vec<f64> = match (&self.state, &self.density_matrix) {
            (Some(state), _) => state.iter().map(Complex64::norm_sqr).collect(),
            (None, Some(rho)) => rho.diag().iter().map(|z| z.re).collect(),
            (None, None) => {
                return Err(HalError::ResultUnavailable("result holds no quantum state".into()));
            }
        };
        let n = self.num_qubits();
        let mut out = vec![0.0; probs.len()];
        for (i, p) in probs.into_iter().enumerate() {
            out[reindex(i, n, order)] = p;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO: Complex64 = Complex64::new(0.0, 0.0);
    const ONE: Complex64 = Complex64::new(1.0, 0.0);

    fn qubits(n: u32) -> Vec<Qubit> {
        (0..n).map(Qubit::new).collect()
    }

    /// `|q0 q1⟩ = |10⟩`, stored little-endian at index 0b01.
    fn first_qubit_flipped() -> Array1<Complex64> {
        Array1::from(vec![ZERO, ONE, ZERO, ZERO])
    }

    #[test]
    fn test_state_orders() {
        let result = BackendResult::from_state(qubits(2), first_qubit_flipped());
        assert_eq!(result.get_state(BasisOrder::Dlo).unwrap()[1], ONE);
        assert_eq!(result.get_state(BasisOrder::Ilo).unwrap()[2], ONE);
        assert!(result.get_density_matrix(BasisOrder::Ilo).is_err());
    }

    #[test]
    fn test_density_matrix_orders() {
        let mut rho = Array2::zeros((8, 8));
        // |q0 q1 q2⟩ = |110⟩: little-endian index 0b011.
        rho[[0b011, 0b011]] = ONE;
        let result = BackendResult::from_density_matrix(qubits(3), rho);

        let ilo = result.get_density_matrix(BasisOrder::Ilo).unwrap();
        assert_eq!(ilo[[0b110, 0b110]], ONE);
        let probs = result.probabilities(BasisOrder::Ilo).unwrap();
        assert!((probs[0b110] - 1.0).abs() < 1e-12);
        assert!(result.get_state(BasisOrder::Dlo).is_err());
    }

    #[test]
    fn test_zero_qubit_result() {
        let result = BackendResult::from_state(vec![], Array1::from(vec![ONE]));
        assert_eq!(result.get_state(BasisOrder::Ilo).unwrap()[0], ONE);
    }

    #[test]
    fn test_serde_round_trip_keeps_bits() {
        let result = BackendResult::from_state(qubits(2), first_qubit_flipped())
            .with_bits(vec![Clbit::new(0)], vec![Some(true)]);
        let json = serde_json::to_string(&result).unwrap();
        let back: BackendResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.bits(), &[Some(true)]);
    }
}
