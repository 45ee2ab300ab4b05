use super::formulation::{Cmp, Model, Relation, VarDomain, VarId};
use super::{SolveOptions, SolveOutcome, SolveStatus, VarValues};
use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolutionStatus, SolverModel, Variable, WithTimeLimit,
};

/// Moteur de résolution : prend un modèle, rend un statut et des valeurs.
///
/// Une implémentation doit être saine (les valeurs rendues satisfont le
/// modèle) et, pour `Optimal`, minimale au sens de l'objectif.
pub trait SolvingEngine {
    fn solve(&self, model: &Model, opts: &SolveOptions) -> SolveOutcome;
}

/// Moteur MILP basé sur `good_lp` et le solveur pur Rust `microlp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MilpEngine;

impl SolvingEngine for MilpEngine {
    fn solve(&self, model: &Model, opts: &SolveOptions) -> SolveOutcome {
        sanitize(model, run_milp(model, opts))
    }
}

fn run_milp(model: &Model, opts: &SolveOptions) -> SolveOutcome {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .domains()
        .iter()
        .map(|domain| match *domain {
            VarDomain::Bool => vars.add(variable().binary()),
            VarDomain::Int { lo, hi } => {
                vars.add(variable().integer().min(lo as f64).max(hi as f64))
            }
        })
        .collect();

    let objective = linear_expr(&handles, model.objective());
    let mut problem = vars.minimise(objective).using(microlp);
    if let Some(limit) = opts.time_limit {
        // le solveur s'arrête lui-même à l'échéance, avec ou sans solution courante
        problem = problem.with_time_limit(limit.as_secs_f64());
    }
    for c in model.constraints() {
        problem = problem.with(to_lp(&handles, &c.relation));
    }

    match problem.solve() {
        Ok(solution) => {
            let status = match solution.status() {
                SolutionStatus::Optimal => SolveStatus::Optimal,
                SolutionStatus::TimeLimit | SolutionStatus::GapLimit => {
                    log_event!(warn, limit = ?opts.time_limit, "solver stopped early, keeping its best schedule");
                    SolveStatus::Feasible
                }
            };
            let values = VarValues::new(
                handles
                    .iter()
                    .map(|v| solution.value(*v).round() as i64)
                    .collect(),
            );
            let objective = model.objective_value(&values);
            SolveOutcome {
                status,
                values: Some(values),
                objective,
            }
        }
        Err(ResolutionError::Infeasible) => SolveOutcome::without_solution(SolveStatus::Infeasible),
        Err(_err) => {
            log_event!(warn, error = %_err, "solver stopped without a verdict");
            SolveOutcome::without_solution(SolveStatus::Unknown)
        }
    }
}

fn linear_expr(handles: &[Variable], terms: &[(VarId, i64)]) -> Expression {
    terms.iter().fold(Expression::from(0.0), |acc, (id, coef)| {
        acc + handles[id.index()] * (*coef as f64)
    })
}

fn to_lp(handles: &[Variable], relation: &Relation) -> good_lp::Constraint {
    let lhs = linear_expr(handles, &relation.terms());
    let rhs = Expression::from(relation.rhs() as f64);
    match relation.cmp() {
        Cmp::Eq => constraint::eq(lhs, rhs),
        Cmp::Le => constraint::leq(lhs, rhs),
        Cmp::Ge => constraint::geq(lhs, rhs),
    }
}

/// Une réponse qui ne respecte pas le modèle n'est jamais transmise au décodeur.
fn sanitize(model: &Model, outcome: SolveOutcome) -> SolveOutcome {
    let Some(values) = outcome.values.as_ref() else {
        return outcome;
    };
    let violations = model.violations(values);
    if violations.is_empty() {
        return outcome;
    }
    log_event!(
        error,
        count = violations.len(),
        first = %violations[0].detail,
        "solver answer violates the model, discarding it"
    );
    SolveOutcome::without_solution(SolveStatus::Unknown)
}
