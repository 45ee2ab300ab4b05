use super::formulation::{Cmp, Constraint, ConstraintKind, Model, Relation, VarDomain, VarLayout};
use super::{util, SchedError};
use crate::model::{validate_roles, AvailabilityGrid, Role};

/// Construit le modèle de contraintes d'une grille, sans le résoudre.
///
/// Échoue uniquement sur une entrée structurellement invalide ; un modèle
/// infaisable est construit normalement et détecté à la résolution.
pub fn build_model(grid: &AvailabilityGrid, roles: &[Role]) -> Result<Model, SchedError> {
    validate_roles(roles)?;

    let n_persons = grid.persons().len();
    let n_dates = grid.dates().len();
    let n_roles = roles.len();
    let layout = VarLayout::new(n_persons, n_dates, n_roles);
    let horizon = (n_dates * n_roles) as i64;

    let mut domains = Vec::with_capacity(layout.len());
    domains.resize(n_persons * n_dates * n_roles, VarDomain::Bool);
    domains.extend(std::iter::repeat(VarDomain::Int { lo: 0, hi: n_dates as i64 }).take(n_persons * n_roles));
    domains.extend(std::iter::repeat(VarDomain::Int { lo: 0, hi: horizon }).take(n_persons));
    domains.push(VarDomain::Int { lo: 0, hi: horizon });
    domains.push(VarDomain::Int { lo: 0, hi: horizon });
    debug_assert_eq!(domains.len(), layout.len());

    let mut constraints = Vec::new();

    // un seul titulaire par (date, rôle)
    for d in 0..n_dates {
        for r in 0..n_roles {
            constraints.push(Constraint {
                kind: ConstraintKind::Coverage { date: d, role: r },
                relation: Relation::ExactlyOne((0..n_persons).map(|p| layout.assign(p, d, r)).collect()),
            });
        }
    }

    // au plus un rôle par (personne, date)
    for d in 0..n_dates {
        for p in 0..n_persons {
            constraints.push(Constraint {
                kind: ConstraintKind::Exclusivity { person: p, date: d },
                relation: Relation::AtMostOne((0..n_roles).map(|r| layout.assign(p, d, r)).collect()),
            });
        }
    }

    for p in 0..n_persons {
        for d in 0..n_dates {
            if grid.availability(p, d).is_available() {
                continue;
            }
            for r in 0..n_roles {
                constraints.push(Constraint {
                    kind: ConstraintKind::Unavailable { person: p, date: d, role: r },
                    relation: Relation::Linear {
                        terms: vec![(layout.assign(p, d, r), 1)],
                        cmp: Cmp::Eq,
                        rhs: 0,
                    },
                });
            }
        }
    }

    let (min_load, max_load) = util::per_person_bounds(n_persons, n_dates, n_roles);
    for p in 0..n_persons {
        let worked: Vec<(_, i64)> = (0..n_dates)
            .flat_map(|d| (0..n_roles).map(move |r| (d, r)))
            .map(|(d, r)| (layout.assign(p, d, r), 1))
            .collect();
        constraints.push(Constraint {
            kind: ConstraintKind::LoadBounds { person: p },
            relation: Relation::Linear {
                terms: worked.clone(),
                cmp: Cmp::Ge,
                rhs: min_load,
            },
        });
        constraints.push(Constraint {
            kind: ConstraintKind::LoadBounds { person: p },
            relation: Relation::Linear {
                terms: worked,
                cmp: Cmp::Le,
                rhs: max_load,
            },
        });
    }

    // count[p,r] - Σ_d x[p,d,r] == 0
    for p in 0..n_persons {
        for r in 0..n_roles {
            let mut terms: Vec<_> = (0..n_dates).map(|d| (layout.assign(p, d, r), 1)).collect();
            terms.push((layout.count(p, r), -1));
            constraints.push(Constraint {
                kind: ConstraintKind::RoleCount { person: p, role: r },
                relation: Relation::Linear {
                    terms,
                    cmp: Cmp::Eq,
                    rhs: 0,
                },
            });
        }
    }

    // deux inégalités par paire de rôles, une dans chaque sens
    for p in 0..n_persons {
        for (over, under) in util::ordered_role_pairs(n_roles) {
            constraints.push(Constraint {
                kind: ConstraintKind::RoleBalance { person: p, over, under },
                relation: Relation::Linear {
                    terms: vec![(layout.count(p, over), 1), (layout.count(p, under), -1)],
                    cmp: Cmp::Le,
                    rhs: 1,
                },
            });
        }
    }

    for p in 0..n_persons {
        let mut terms: Vec<_> = (0..n_roles).map(|r| (layout.count(p, r), 1)).collect();
        terms.push((layout.total(p), -1));
        constraints.push(Constraint {
            kind: ConstraintKind::TotalLoad { person: p },
            relation: Relation::Linear {
                terms,
                cmp: Cmp::Eq,
                rhs: 0,
            },
        });
    }

    for p in 0..n_persons {
        constraints.push(Constraint {
            kind: ConstraintKind::MaxLoad { person: p },
            relation: Relation::Linear {
                terms: vec![(layout.total(p), 1), (layout.max_load(), -1)],
                cmp: Cmp::Le,
                rhs: 0,
            },
        });
        constraints.push(Constraint {
            kind: ConstraintKind::MinLoad { person: p },
            relation: Relation::Linear {
                terms: vec![(layout.total(p), 1), (layout.min_load(), -1)],
                cmp: Cmp::Ge,
                rhs: 0,
            },
        });
    }

    let objective = vec![(layout.max_load(), 1), (layout.min_load(), -1)];

    log_event!(
        debug,
        persons = n_persons,
        dates = n_dates,
        roles = n_roles,
        vars = domains.len(),
        constraints = constraints.len(),
        min_load,
        max_load,
        "model built"
    );

    Ok(Model {
        layout,
        domains,
        constraints,
        objective,
        load_bounds: (min_load, max_load),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Availability, DateLabel, PersonId};

    fn grid(rows: &[&[Availability]]) -> AvailabilityGrid {
        let persons = (0..rows.len()).map(|i| PersonId::new(format!("p{i}"))).collect();
        let dates = (0..rows[0].len()).map(|i| DateLabel::new(format!("{}", i + 1))).collect();
        AvailabilityGrid::new(persons, dates, rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn count_kind(model: &Model, pred: impl Fn(&ConstraintKind) -> bool) -> usize {
        model.constraints().iter().filter(|c| pred(&c.kind)).count()
    }

    #[test]
    fn constraint_counts_follow_dimensions() {
        use Availability::*;
        let g = grid(&[
            &[Available, Unavailable],
            &[Available, Available],
            &[Available, Available],
        ]);
        let model = build_model(&g, &Role::default_set()).unwrap();

        assert_eq!(model.num_vars(), 3 * 2 * 3 + 3 * 3 + 3 + 2);
        assert_eq!(count_kind(&model, |k| matches!(k, ConstraintKind::Coverage { .. })), 6);
        assert_eq!(count_kind(&model, |k| matches!(k, ConstraintKind::Exclusivity { .. })), 6);
        assert_eq!(count_kind(&model, |k| matches!(k, ConstraintKind::Unavailable { .. })), 3);
        assert_eq!(count_kind(&model, |k| matches!(k, ConstraintKind::LoadBounds { .. })), 6);
        assert_eq!(count_kind(&model, |k| matches!(k, ConstraintKind::RoleBalance { .. })), 18);
        assert_eq!(model.load_bounds(), (2, 2));
    }

    #[test]
    fn unavailable_cells_pin_every_role_to_zero() {
        use Availability::*;
        let g = grid(&[&[Unavailable], &[Available], &[Available]]);
        let model = build_model(&g, &Role::default_set()).unwrap();
        let layout = model.layout();
        let pinned: Vec<_> = model
            .constraints()
            .iter()
            .filter_map(|c| match (&c.kind, &c.relation) {
                (ConstraintKind::Unavailable { .. }, Relation::Linear { terms, .. }) => Some(terms[0].0),
                _ => None,
            })
            .collect();
        assert_eq!(pinned, vec![layout.assign(0, 0, 0), layout.assign(0, 0, 1), layout.assign(0, 0, 2)]);
    }

    #[test]
    fn infeasible_input_still_builds() {
        use Availability::*;
        // deux personnes pour trois téléphones : infaisable, mais valide
        let g = grid(&[&[Available], &[Available]]);
        assert!(build_model(&g, &Role::default_set()).is_ok());
    }

    #[test]
    fn rejects_bad_role_sets() {
        use Availability::*;
        let g = grid(&[&[Available]]);
        assert!(matches!(build_model(&g, &[]), Err(SchedError::MalformedInput(_))));
        let dup = vec![Role::new("A"), Role::new("A")];
        assert!(matches!(build_model(&g, &dup), Err(SchedError::MalformedInput(_))));
    }

    #[test]
    fn spread_limit_adds_one_constraint() {
        use Availability::*;
        let g = grid(&[&[Available], &[Available], &[Available]]);
        let model = build_model(&g, &Role::default_set()).unwrap();
        let limited = model.with_spread_limit(0);
        assert_eq!(limited.constraints().len(), model.constraints().len() + 1);
        assert_eq!(
            limited.constraints().last().map(|c| c.kind),
            Some(ConstraintKind::SpreadLimit)
        );
    }
}
