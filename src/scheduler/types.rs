use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Options de résolution
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    /// Budget de temps accordé au moteur ; `None` = pas de limite.
    pub time_limit: Option<Duration>,
}

impl SolveOptions {
    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
        }
    }
}

/// Statut rendu par le moteur de résolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
}

impl SolveStatus {
    /// Seuls `Optimal` et `Feasible` portent une affectation décodable.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Valeurs entières de toutes les variables d'un modèle, indexées par `VarId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarValues(Vec<i64>);

impl VarValues {
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }
    pub fn get(&self, id: super::VarId) -> Option<i64> {
        self.0.get(id.index()).copied()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

/// Réponse du moteur
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub values: Option<VarValues>,
    pub objective: Option<i64>,
}

impl SolveOutcome {
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            values: None,
            objective: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error(
        "no valid schedule exists under the given availability ({persons} persons, {dates} dates, {roles} roles)"
    )]
    Infeasible {
        persons: usize,
        dates: usize,
        roles: usize,
    },
    #[error("solver stopped before producing a schedule (time limit reached or status unknown)")]
    SolveTimeout,
    #[error("decoded solution is inconsistent: {0}")]
    DecodeConsistency(String),
}
