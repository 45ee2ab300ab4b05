use super::{check, VarValues};
use std::fmt;

/// Index d'une variable dans un `Model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub(super) fn from_index(index: usize) -> Self {
        Self(index)
    }
    pub fn index(self) -> usize {
        self.0
    }
}

/// Disposition fixe des variables : `x[p,d,r]`, puis `count[p,r]`, puis
/// `total[p]`, puis `maxLoad` et `minLoad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLayout {
    persons: usize,
    dates: usize,
    roles: usize,
}

impl VarLayout {
    pub fn new(persons: usize, dates: usize, roles: usize) -> Self {
        Self {
            persons,
            dates,
            roles,
        }
    }

    pub fn persons(&self) -> usize {
        self.persons
    }
    pub fn dates(&self) -> usize {
        self.dates
    }
    pub fn roles(&self) -> usize {
        self.roles
    }

    fn assign_len(&self) -> usize {
        self.persons * self.dates * self.roles
    }
    fn count_len(&self) -> usize {
        self.persons * self.roles
    }

    /// `x[p,d,r]` : la personne `p` tient le rôle `r` à la date `d`.
    pub fn assign(&self, p: usize, d: usize, r: usize) -> VarId {
        debug_assert!(p < self.persons && d < self.dates && r < self.roles);
        VarId((p * self.dates + d) * self.roles + r)
    }

    /// `count[p,r]` : nombre de dates où `p` tient `r`.
    pub fn count(&self, p: usize, r: usize) -> VarId {
        debug_assert!(p < self.persons && r < self.roles);
        VarId(self.assign_len() + p * self.roles + r)
    }

    /// `total[p]` : charge totale de `p`.
    pub fn total(&self, p: usize) -> VarId {
        debug_assert!(p < self.persons);
        VarId(self.assign_len() + self.count_len() + p)
    }

    pub fn max_load(&self) -> VarId {
        VarId(self.assign_len() + self.count_len() + self.persons)
    }

    pub fn min_load(&self) -> VarId {
        VarId(self.assign_len() + self.count_len() + self.persons + 1)
    }

    /// Nombre total de variables.
    pub fn len(&self) -> usize {
        self.assign_len() + self.count_len() + self.persons + 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nom lisible d'une variable (diagnostics).
    pub fn describe(&self, id: VarId) -> String {
        let i = id.index();
        if i < self.assign_len() {
            let r = i % self.roles;
            let d = (i / self.roles) % self.dates;
            let p = i / (self.roles * self.dates);
            format!("x[p{p},d{d},r{r}]")
        } else if i < self.assign_len() + self.count_len() {
            let j = i - self.assign_len();
            format!("count[p{},r{}]", j / self.roles, j % self.roles)
        } else if i < self.max_load().index() {
            format!("total[p{}]", i - self.assign_len() - self.count_len())
        } else if id == self.max_load() {
            "maxLoad".to_string()
        } else if id == self.min_load() {
            "minLoad".to_string()
        } else {
            format!("var{i}")
        }
    }
}

/// Domaine d'une variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarDomain {
    Bool,
    Int { lo: i64, hi: i64 },
}

impl VarDomain {
    pub fn lo(self) -> i64 {
        match self {
            VarDomain::Bool => 0,
            VarDomain::Int { lo, .. } => lo,
        }
    }
    pub fn hi(self) -> i64 {
        match self {
            VarDomain::Bool => 1,
            VarDomain::Int { hi, .. } => hi,
        }
    }
    pub fn contains(self, value: i64) -> bool {
        self.lo() <= value && value <= self.hi()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cmp::Eq => "==",
            Cmp::Le => "<=",
            Cmp::Ge => ">=",
        })
    }
}

/// Forme mathématique d'une contrainte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    ExactlyOne(Vec<VarId>),
    AtMostOne(Vec<VarId>),
    Linear {
        terms: Vec<(VarId, i64)>,
        cmp: Cmp,
        rhs: i64,
    },
}

impl Relation {
    /// Termes linéaires équivalents (coefficient 1 pour les formes "un parmi N").
    pub fn terms(&self) -> Vec<(VarId, i64)> {
        match self {
            Relation::ExactlyOne(vars) | Relation::AtMostOne(vars) => {
                vars.iter().map(|v| (*v, 1)).collect()
            }
            Relation::Linear { terms, .. } => terms.clone(),
        }
    }

    pub fn cmp(&self) -> Cmp {
        match self {
            Relation::ExactlyOne(_) => Cmp::Eq,
            Relation::AtMostOne(_) => Cmp::Le,
            Relation::Linear { cmp, .. } => *cmp,
        }
    }

    pub fn rhs(&self) -> i64 {
        match self {
            Relation::ExactlyOne(_) | Relation::AtMostOne(_) => 1,
            Relation::Linear { rhs, .. } => *rhs,
        }
    }
}

/// Origine d'une contrainte, en indices personne / date / rôle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Coverage { date: usize, role: usize },
    Exclusivity { person: usize, date: usize },
    Unavailable { person: usize, date: usize, role: usize },
    LoadBounds { person: usize },
    RoleCount { person: usize, role: usize },
    RoleBalance { person: usize, over: usize, under: usize },
    TotalLoad { person: usize },
    MaxLoad { person: usize },
    MinLoad { person: usize },
    SpreadLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub relation: Relation,
}

/// Modèle de contraintes complet, immuable une fois construit.
///
/// Ne porte aucun état de solveur : un moteur le traduit à chaque appel.
#[derive(Debug, Clone)]
pub struct Model {
    pub(super) layout: VarLayout,
    pub(super) domains: Vec<VarDomain>,
    pub(super) constraints: Vec<Constraint>,
    pub(super) objective: Vec<(VarId, i64)>,
    pub(super) load_bounds: (i64, i64),
}

impl Model {
    pub fn layout(&self) -> VarLayout {
        self.layout
    }
    pub fn domains(&self) -> &[VarDomain] {
        &self.domains
    }
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
    /// Termes de l'objectif (à minimiser).
    pub fn objective(&self) -> &[(VarId, i64)] {
        &self.objective
    }
    /// Bornes `[min_per_person, max_per_person]` de la charge individuelle.
    pub fn load_bounds(&self) -> (i64, i64) {
        self.load_bounds
    }
    pub fn num_vars(&self) -> usize {
        self.domains.len()
    }

    /// Copie du modèle avec `maxLoad - minLoad <= limit`.
    pub fn with_spread_limit(&self, limit: i64) -> Model {
        let mut model = self.clone();
        model.constraints.push(Constraint {
            kind: ConstraintKind::SpreadLimit,
            relation: Relation::Linear {
                terms: vec![(self.layout.max_load(), 1), (self.layout.min_load(), -1)],
                cmp: Cmp::Le,
                rhs: limit,
            },
        });
        model
    }

    pub fn objective_value(&self, values: &VarValues) -> Option<i64> {
        self.objective
            .iter()
            .map(|(id, coef)| values.get(*id).map(|v| v * coef))
            .sum()
    }

    /// Contraintes et domaines violés par `values`.
    pub fn violations(&self, values: &VarValues) -> Vec<check::Violation> {
        check::detect_violations(self, values)
    }
}
