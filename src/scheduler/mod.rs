mod builder;
mod check;
mod decode;
mod engine;
mod formulation;
mod types;
mod util;

pub use builder::build_model;
pub use check::{Violation, ViolationKind};
pub use decode::{decode, ScheduleRow, ScheduleTable, SummaryRow, SummaryTable};
pub use engine::{MilpEngine, SolvingEngine};
pub use formulation::{
    Cmp, Constraint, ConstraintKind, Model, Relation, VarDomain, VarId, VarLayout,
};
pub use types::{SchedError, SolveOptions, SolveOutcome, SolveStatus, VarValues};

use crate::model::{AvailabilityGrid, Role};

/// Résout un modèle avec le moteur MILP par défaut.
pub fn solve(model: &Model, opts: &SolveOptions) -> SolveOutcome {
    MilpEngine.solve(model, opts)
}

/// Résultat d'une planification réussie
#[derive(Debug, Clone)]
pub struct Plan {
    pub schedule: ScheduleTable,
    pub summary: SummaryTable,
    pub status: SolveStatus,
    /// Écart `maxLoad - minLoad` atteint.
    pub objective: Option<i64>,
}

impl Plan {
    /// `false` si le moteur a rendu une solution sans prouver son optimalité.
    pub fn is_proven_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Scheduler : enchaîne construction, résolution et décodage.
///
/// Ne conserve que le moteur ; chaque appel à `plan` construit son propre modèle.
#[derive(Debug, Default, Clone)]
pub struct Scheduler<E = MilpEngine> {
    engine: E,
}

impl Scheduler<MilpEngine> {
    pub fn new() -> Self {
        Self { engine: MilpEngine }
    }
}

impl<E: SolvingEngine> Scheduler<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn plan(
        &self,
        grid: &AvailabilityGrid,
        roles: &[Role],
        opts: &SolveOptions,
    ) -> Result<Plan, SchedError> {
        let model = build_model(grid, roles)?;
        self.plan_model(&model, grid, roles, opts)
    }

    /// Comme `plan`, avec un écart de charge maximal imposé.
    pub fn plan_with_spread_limit(
        &self,
        grid: &AvailabilityGrid,
        roles: &[Role],
        opts: &SolveOptions,
        max_spread: i64,
    ) -> Result<Plan, SchedError> {
        let model = build_model(grid, roles)?.with_spread_limit(max_spread);
        self.plan_model(&model, grid, roles, opts)
    }

    fn plan_model(
        &self,
        model: &Model,
        grid: &AvailabilityGrid,
        roles: &[Role],
        opts: &SolveOptions,
    ) -> Result<Plan, SchedError> {
        let outcome = self.engine.solve(model, opts);
        log_event!(info, status = %outcome.status, objective = ?outcome.objective, "solve finished");

        match (outcome.status, outcome.values) {
            (SolveStatus::Infeasible, _) => Err(SchedError::Infeasible {
                persons: grid.persons().len(),
                dates: grid.dates().len(),
                roles: roles.len(),
            }),
            (status, Some(values)) if status.has_solution() => {
                let (schedule, summary) = decode(&values, grid.persons(), grid.dates(), roles)?;
                Ok(Plan {
                    schedule,
                    summary,
                    status,
                    objective: outcome.objective,
                })
            }
            _ => Err(SchedError::SolveTimeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Availability, DateLabel, PersonId};

    /// Moteur factice qui rejoue une réponse figée.
    struct Replay(SolveOutcome);

    impl SolvingEngine for Replay {
        fn solve(&self, _model: &Model, _opts: &SolveOptions) -> SolveOutcome {
            self.0.clone()
        }
    }

    fn grid() -> AvailabilityGrid {
        AvailabilityGrid::new(
            vec![PersonId::new("a"), PersonId::new("b"), PersonId::new("c")],
            vec![DateLabel::new("1")],
            vec![vec![Availability::Available]; 3],
        )
        .unwrap()
    }

    #[test]
    fn infeasible_maps_to_error() {
        let s = Scheduler::with_engine(Replay(SolveOutcome::without_solution(SolveStatus::Infeasible)));
        let err = s.plan(&grid(), &Role::default_set(), &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SchedError::Infeasible { persons: 3, dates: 1, roles: 3 }));
    }

    #[test]
    fn unknown_maps_to_timeout() {
        let s = Scheduler::with_engine(Replay(SolveOutcome::without_solution(SolveStatus::Unknown)));
        let err = s.plan(&grid(), &Role::default_set(), &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SchedError::SolveTimeout));
    }

    #[test]
    fn feasible_is_decoded_but_not_proven() {
        let g = grid();
        let roles = Role::default_set();
        let layout = build_model(&g, &roles).unwrap().layout();
        let mut v = vec![0; layout.len()];
        for p in 0..3 {
            v[layout.assign(p, 0, p).index()] = 1;
            v[layout.count(p, p).index()] = 1;
            v[layout.total(p).index()] = 1;
        }
        v[layout.max_load().index()] = 1;
        v[layout.min_load().index()] = 1;
        let s = Scheduler::with_engine(Replay(SolveOutcome {
            status: SolveStatus::Feasible,
            values: Some(VarValues::new(v)),
            objective: Some(0),
        }));
        let plan = s.plan(&g, &roles, &SolveOptions::default()).unwrap();
        assert!(!plan.is_proven_optimal());
        assert_eq!(plan.schedule.assignee("1", "C").map(PersonId::as_str), Some("c"));
    }

    #[test]
    fn broken_engine_answer_is_not_infeasibility() {
        let g = grid();
        let layout = build_model(&g, &Role::default_set()).unwrap().layout();
        let s = Scheduler::with_engine(Replay(SolveOutcome {
            status: SolveStatus::Optimal,
            values: Some(VarValues::new(vec![0; layout.len()])),
            objective: Some(0),
        }));
        let err = s.plan(&g, &Role::default_set(), &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SchedError::DecodeConsistency(_)));
    }
}
