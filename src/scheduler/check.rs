use super::formulation::{Cmp, ConstraintKind, Model, VarId};
use super::VarValues;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Nombre de valeurs différent du nombre de variables.
    Shape { expected: usize, got: usize },
    /// Valeur hors du domaine de la variable.
    Domain { var: VarId, value: i64 },
    /// Contrainte non satisfaite ; `lhs` est la valeur calculée.
    Constraint { kind: ConstraintKind, lhs: i64, cmp: Cmp, rhs: i64 },
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub kind: ViolationKind,
    pub detail: String,
}

pub(super) fn detect_violations(model: &Model, values: &VarValues) -> Vec<Violation> {
    let mut out = Vec::new();

    if values.len() != model.num_vars() {
        out.push(Violation {
            kind: ViolationKind::Shape {
                expected: model.num_vars(),
                got: values.len(),
            },
            detail: format!("expected {} values, got {}", model.num_vars(), values.len()),
        });
        return out;
    }

    let layout = model.layout();
    for (i, (domain, value)) in model.domains().iter().zip(values.as_slice()).enumerate() {
        if !domain.contains(*value) {
            let var = VarId::from_index(i);
            out.push(Violation {
                kind: ViolationKind::Domain { var, value: *value },
                detail: format!(
                    "{} = {value} outside [{}, {}]",
                    layout.describe(var),
                    domain.lo(),
                    domain.hi()
                ),
            });
        }
    }

    for constraint in model.constraints() {
        let relation = &constraint.relation;
        let lhs: i64 = relation
            .terms()
            .iter()
            .map(|(id, coef)| values.get(*id).unwrap_or(0) * coef)
            .sum();
        let (cmp, rhs) = (relation.cmp(), relation.rhs());
        let ok = match cmp {
            Cmp::Eq => lhs == rhs,
            Cmp::Le => lhs <= rhs,
            Cmp::Ge => lhs >= rhs,
        };
        if !ok {
            out.push(Violation {
                kind: ViolationKind::Constraint {
                    kind: constraint.kind,
                    lhs,
                    cmp,
                    rhs,
                },
                detail: format!("{:?}: {lhs} {cmp} {rhs} does not hold", constraint.kind),
            });
        }
    }

    out
}
