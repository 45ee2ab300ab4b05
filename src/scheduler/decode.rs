use super::formulation::VarLayout;
use super::{SchedError, VarValues};
use crate::model::{DateLabel, PersonId, Role};

/// Une ligne du planning : le titulaire de chaque rôle, dans l'ordre des rôles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub date: DateLabel,
    pub assignees: Vec<PersonId>,
}

/// Planning date × rôle, dates dans l'ordre d'origine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTable {
    roles: Vec<Role>,
    rows: Vec<ScheduleRow>,
}

impl ScheduleTable {
    pub fn new(roles: Vec<Role>, rows: Vec<ScheduleRow>) -> Self {
        Self { roles, rows }
    }
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    /// Titulaire de `role` à `date`.
    pub fn assignee(&self, date: &str, role: &str) -> Option<&PersonId> {
        let r = self.roles.iter().position(|x| x.as_str() == role)?;
        self.rows
            .iter()
            .find(|row| row.date.as_str() == date)
            .and_then(|row| row.assignees.get(r))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub person: PersonId,
    pub counts: Vec<u32>,
}

impl SummaryRow {
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Charge par personne et par rôle, personnes dans l'ordre d'origine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    roles: Vec<Role>,
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(roles: Vec<Role>, rows: Vec<SummaryRow>) -> Self {
        Self { roles, rows }
    }
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn count(&self, person: &str, role: &str) -> Option<u32> {
        let r = self.roles.iter().position(|x| x.as_str() == role)?;
        self.rows
            .iter()
            .find(|row| row.person.as_str() == person)
            .and_then(|row| row.counts.get(r).copied())
    }

    pub fn total(&self, person: &str) -> Option<u32> {
        self.rows
            .iter()
            .find(|row| row.person.as_str() == person)
            .map(SummaryRow::total)
    }

    /// Recompte un planning : chaque occurrence d'une personne dans une colonne.
    pub fn from_schedule(schedule: &ScheduleTable, persons: &[PersonId]) -> Self {
        let rows = persons
            .iter()
            .map(|person| SummaryRow {
                person: person.clone(),
                counts: (0..schedule.roles.len())
                    .map(|r| {
                        schedule
                            .rows
                            .iter()
                            .filter(|row| row.assignees.get(r) == Some(person))
                            .count() as u32
                    })
                    .collect(),
            })
            .collect();
        Self {
            roles: schedule.roles.clone(),
            rows,
        }
    }
}

/// Traduit les valeurs résolues en planning et en bilan.
///
/// À n'appeler que sur une réponse `Optimal`/`Feasible` ; toute incohérence
/// est une rupture de contrat du moteur ou du modèle (`DecodeConsistency`).
pub fn decode(
    values: &VarValues,
    persons: &[PersonId],
    dates: &[DateLabel],
    roles: &[Role],
) -> Result<(ScheduleTable, SummaryTable), SchedError> {
    let layout = VarLayout::new(persons.len(), dates.len(), roles.len());
    if values.len() != layout.len() {
        return Err(SchedError::DecodeConsistency(format!(
            "expected {} variable values, got {}",
            layout.len(),
            values.len()
        )));
    }

    let is_set = |p: usize, d: usize, r: usize| -> Result<bool, SchedError> {
        match values.get(layout.assign(p, d, r)) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            other => Err(SchedError::DecodeConsistency(format!(
                "assignment of {} on {} for role {} is {other:?}, expected 0 or 1",
                persons[p], dates[d], roles[r]
            ))),
        }
    };

    let mut rows = Vec::with_capacity(dates.len());
    for (d, date) in dates.iter().enumerate() {
        let mut assignees = Vec::with_capacity(roles.len());
        for (r, role) in roles.iter().enumerate() {
            let mut holders = Vec::new();
            for p in 0..persons.len() {
                if is_set(p, d, r)? {
                    holders.push(p);
                }
            }
            match holders.as_slice() {
                [p] => assignees.push(persons[*p].clone()),
                _ => {
                    return Err(SchedError::DecodeConsistency(format!(
                        "date {date}, role {role}: {} persons assigned",
                        holders.len()
                    )))
                }
            }
        }
        rows.push(ScheduleRow {
            date: date.clone(),
            assignees,
        });
    }
    let schedule = ScheduleTable::new(roles.to_vec(), rows);

    let summary = SummaryTable::from_schedule(&schedule, persons);
    for (p, row) in summary.rows.iter().enumerate() {
        for (r, counted) in row.counts.iter().enumerate() {
            let reported = values.get(layout.count(p, r));
            if reported != Some(i64::from(*counted)) {
                return Err(SchedError::DecodeConsistency(format!(
                    "{} holds {} {} times but the solver reported {reported:?}",
                    persons[p], roles[r], counted
                )));
            }
        }
    }

    log_event!(
        debug,
        dates = schedule.rows.len(),
        persons = summary.rows.len(),
        "solution decoded"
    );

    Ok((schedule, summary))
}
