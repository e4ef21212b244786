//! Named matrix operations, for front-ends that select work by keyword.

use crate::graph::{diag_deg_mat, normalized_laplacian, weighted_adj_mat};
use crate::jacobi::{jacobi_eval_evec, JacobiConfig};
use crate::matrix::Matrix;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Goal {
    /// Weighted adjacency matrix of observations.
    Wam,
    /// Diagonal degree matrix of observations.
    Ddg,
    /// Normalized graph Laplacian of observations.
    Lnorm,
    /// Eigendecomposition of a symmetric matrix.
    Jacobi,
}

impl Goal {
    pub const ALL: [Goal; 4] = [Goal::Wam, Goal::Ddg, Goal::Lnorm, Goal::Jacobi];

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Wam => "wam",
            Goal::Ddg => "ddg",
            Goal::Lnorm => "lnorm",
            Goal::Jacobi => "jacobi",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Goal::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| Error::UnknownGoal(s.to_string()))
    }
}

/// Run one goal.
///
/// `wam`, `ddg` and `lnorm` read `input` as `n × d` observations. `jacobi`
/// reads it as a symmetric matrix and returns the `(n + 1) × n` stacked
/// result (eigenvalues in row 0, unsorted).
pub fn run_goal(goal: Goal, input: &Matrix, cfg: &JacobiConfig) -> Result<Matrix> {
    log::debug!("running goal {goal} on {} x {} input", input.nrows(), input.ncols());
    match goal {
        Goal::Wam => weighted_adj_mat(input),
        Goal::Ddg => {
            let w = weighted_adj_mat(input)?;
            diag_deg_mat(&w)
        }
        Goal::Lnorm => normalized_laplacian(input),
        Goal::Jacobi => jacobi_eval_evec(input, cfg)?.to_stacked(),
    }
}
