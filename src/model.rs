use crate::scheduler::SchedError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifiant fort pour Person (le nom tel qu'il apparaît dans la grille)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Libellé d'une date de la période (ex. jour du mois)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateLabel(String);

impl DateLabel {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ligne de permanence ("téléphone") à tenir une fois par date
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Role(String);

impl Role {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Jeu de référence : trois téléphones A, B, C.
    pub fn default_set() -> Vec<Role> {
        ["A", "B", "C"].into_iter().map(Role::new).collect()
    }

    /// Parse une liste "A,B,C".
    pub fn parse_list(raw: &str) -> Result<Vec<Role>, SchedError> {
        let roles: Vec<Role> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Role::new)
            .collect();
        validate_roles(&roles)?;
        Ok(roles)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vérifie qu'un jeu de rôles est non vide et sans doublon.
pub fn validate_roles(roles: &[Role]) -> Result<(), SchedError> {
    if roles.is_empty() {
        return Err(SchedError::MalformedInput("role set is empty".into()));
    }
    let mut seen = HashSet::new();
    for role in roles {
        if role.as_str().trim().is_empty() {
            return Err(SchedError::MalformedInput("role label cannot be empty".into()));
        }
        if !seen.insert(role.as_str()) {
            return Err(SchedError::MalformedInput(format!(
                "duplicate role: {role}"
            )));
        }
    }
    Ok(())
}

/// État d'une personne pour une date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Grille normalisée personnes × dates, validée à la construction.
///
/// Les cellules sont stockées à plat, ligne par personne, dans l'ordre des dates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AvailabilityGrid {
    persons: Vec<PersonId>,
    dates: Vec<DateLabel>,
    cells: Vec<Availability>,
}

impl AvailabilityGrid {
    /// Construit la grille ; `cells[p]` donne une entrée par date.
    pub fn new(
        persons: Vec<PersonId>,
        dates: Vec<DateLabel>,
        cells: Vec<Vec<Availability>>,
    ) -> Result<Self, SchedError> {
        if persons.is_empty() {
            return Err(SchedError::MalformedInput("person list is empty".into()));
        }
        if dates.is_empty() {
            return Err(SchedError::MalformedInput("date list is empty".into()));
        }
        check_unique(persons.iter().map(PersonId::as_str), "person")?;
        check_unique(dates.iter().map(DateLabel::as_str), "date")?;
        if cells.len() != persons.len() {
            return Err(SchedError::MalformedInput(format!(
                "expected {} availability rows, got {}",
                persons.len(),
                cells.len()
            )));
        }

        let mut flat = Vec::with_capacity(persons.len() * dates.len());
        for (person, row) in persons.iter().zip(cells) {
            if row.len() != dates.len() {
                return Err(SchedError::MalformedInput(format!(
                    "person {person}: expected {} cells, got {}",
                    dates.len(),
                    row.len()
                )));
            }
            flat.extend(row);
        }

        Ok(Self {
            persons,
            dates,
            cells: flat,
        })
    }

    pub fn persons(&self) -> &[PersonId] {
        &self.persons
    }
    pub fn dates(&self) -> &[DateLabel] {
        &self.dates
    }

    /// Disponibilité de la personne `p` à la date `d` (indices).
    pub fn availability(&self, p: usize, d: usize) -> Availability {
        self.cells[p * self.dates.len() + d]
    }

    /// Nombre de personnes disponibles à la date `d`.
    pub fn available_count(&self, d: usize) -> usize {
        (0..self.persons.len())
            .filter(|&p| self.availability(p, d).is_available())
            .count()
    }

    pub fn find_person(&self, name: &str) -> Option<usize> {
        self.persons.iter().position(|p| p.as_str() == name)
    }
}

fn check_unique<'a, I: Iterator<Item = &'a str>>(items: I, what: &str) -> Result<(), SchedError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.trim().is_empty() {
            return Err(SchedError::MalformedInput(format!("empty {what} label")));
        }
        if !seen.insert(item) {
            return Err(SchedError::MalformedInput(format!("duplicate {what}: {item}")));
        }
    }
    Ok(())
}
