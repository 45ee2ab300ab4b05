use crate::model::{Availability, AvailabilityGrid, DateLabel, PersonId};
use crate::scheduler::{Plan, SchedError, ScheduleTable, SummaryTable};
use anyhow::Context;
use csv::{ReaderBuilder, WriterBuilder};
use serde_json::{json, Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Grille de référence : 8 pompiers, 11 gardes. `.` = disponible.
pub const SAMPLE_GRID: &str = "\
name\t1\t4\t7\t10\t13\t16\t19\t22\t25\t28\t31
ΠΟΤΗΡΑΣ\tΡ\t.\tP\t.\t.\t.\tP\t.\tP\tP\t.
ΜΑΚΡΗΣ\t.\tP\t.\t.\tA\t.\t.\t.\t.\tA\tA
ΓΩΓΟΣ\tP\t.\tP\t.\t.\tP\t.\t.\t.\t.\tP
ΧΑΡΙΤΙΔΗΣ\t.\t.\t.\t.\t.\tP\tP\tP\t.\tP\t.
ΤΣΙΩΤΡΑΣ\tP\t.\tP\tP\t.\t.\t.\tP\t.\t.\t.
ΒΕΣΚΟΣ\t.\tP\t.\tA\tA\tP\t.\t.\t.\t.\t.
ΚΙΟΣΣΕΣ\t.\tP\t.\t.\tP\t.\tP\t.\t.\tP\t.
ΛΑΖΑΡΙΔΗΣ\t.\t.\t.\tP\t.\tP\t.\tP\tP\t.\t.
";

/// Format de la grille d'entrée
#[derive(Debug, Clone)]
pub struct GridFormat {
    /// Jeton signifiant "disponible" ; tout autre jeton non vide = indisponible.
    pub placeholder: String,
}

impl Default for GridFormat {
    fn default() -> Self {
        Self {
            placeholder: ".".to_string(),
        }
    }
}

impl GridFormat {
    fn classify(&self, token: &str) -> Availability {
        if token == self.placeholder {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }
}

/// Parse une grille séparée par des blancs : en-tête `label date1 date2 ...`,
/// puis une ligne par personne `nom jeton1 jeton2 ...`.
pub fn parse_grid(text: &str, format: &GridFormat) -> Result<AvailabilityGrid, SchedError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(SchedError::MalformedInput("grid is empty".into()));
    };
    let dates: Vec<DateLabel> = header.split_whitespace().skip(1).map(DateLabel::new).collect();

    let mut persons = Vec::new();
    let mut cells = Vec::new();
    for (line_no, line) in lines {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else { continue };
        let row: Vec<Availability> = tokens.map(|t| format.classify(t)).collect();
        if row.len() != dates.len() {
            return Err(SchedError::MalformedInput(format!(
                "line {line_no}: person {name} has {} cells, expected {}",
                row.len(),
                dates.len()
            )));
        }
        persons.push(PersonId::new(name));
        cells.push(row);
    }

    AvailabilityGrid::new(persons, dates, cells)
}

/// Lit une grille texte depuis un fichier.
pub fn read_grid_file<P: AsRef<Path>>(path: P, format: &GridFormat) -> anyhow::Result<AvailabilityGrid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let grid = parse_grid(&text, format).with_context(|| format!("parsing {}", path.display()))?;
    Ok(grid)
}

/// Import CSV : header `label,date1,date2,...`, puis `nom,jeton,...`.
pub fn import_grid_csv<P: AsRef<Path>>(path: P, format: &GridFormat) -> anyhow::Result<AvailabilityGrid> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let dates: Vec<DateLabel> = rdr
        .headers()?
        .iter()
        .skip(1)
        .map(|h| DateLabel::new(h.trim()))
        .collect();

    let mut persons = Vec::new();
    let mut cells = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing person name")?.trim();
        if name.is_empty() && rec.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let mut row = Vec::with_capacity(dates.len());
        for (i, date) in dates.iter().enumerate() {
            let token = rec.get(i + 1).map(str::trim).unwrap_or("");
            if token.is_empty() {
                return Err(SchedError::MalformedInput(format!(
                    "person {name}: missing cell for date {date}"
                ))
                .into());
            }
            row.push(format.classify(token));
        }
        if rec.len() > dates.len() + 1 {
            return Err(SchedError::MalformedInput(format!(
                "person {name}: {} extra cells",
                rec.len() - dates.len() - 1
            ))
            .into());
        }
        persons.push(PersonId::new(name));
        cells.push(row);
    }

    Ok(AvailabilityGrid::new(persons, dates, cells)?)
}

/// Export CSV du planning: header `date,<rôles...>`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, schedule: &ScheduleTable) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    let mut header = vec!["date"];
    header.extend(schedule.roles().iter().map(|r| r.as_str()));
    w.write_record(&header)?;
    for row in schedule.rows() {
        let mut rec = vec![row.date.as_str()];
        rec.extend(row.assignees.iter().map(|p| p.as_str()));
        w.write_record(&rec)?;
    }
    let data = w
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flushing schedule csv: {}", err.error()))?;
    write_atomic(path.as_ref(), &data)
}

/// Export CSV du bilan: header `person,<rôles...>,total`
pub fn export_summary_csv<P: AsRef<Path>>(path: P, summary: &SummaryTable) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    let mut header = vec!["person"];
    header.extend(summary.roles().iter().map(|r| r.as_str()));
    header.push("total");
    w.write_record(&header)?;

    let mut buf = itoa::Buffer::new();
    for row in summary.rows() {
        let mut rec: Vec<String> = vec![row.person.as_str().to_string()];
        rec.extend(row.counts.iter().map(|c| buf.format(*c).to_string()));
        rec.push(buf.format(row.total()).to_string());
        w.write_record(&rec)?;
    }
    let data = w
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flushing summary csv: {}", err.error()))?;
    write_atomic(path.as_ref(), &data)
}

/// Représentation JSON d'un plan (statut, planning, bilan).
pub fn plan_to_json(plan: &Plan) -> Value {
    let roles = plan.schedule.roles();
    let schedule: Vec<Value> = plan
        .schedule
        .rows()
        .iter()
        .map(|row| {
            let assignments: Map<String, Value> = roles
                .iter()
                .zip(&row.assignees)
                .map(|(r, p)| (r.as_str().to_string(), Value::from(p.as_str())))
                .collect();
            json!({ "date": row.date.as_str(), "assignments": assignments })
        })
        .collect();
    let summary: Vec<Value> = plan
        .summary
        .rows()
        .iter()
        .map(|row| {
            let counts: Map<String, Value> = roles
                .iter()
                .zip(&row.counts)
                .map(|(r, c)| (r.as_str().to_string(), Value::from(*c)))
                .collect();
            json!({ "person": row.person.as_str(), "counts": counts, "total": row.total() })
        })
        .collect();
    json!({
        "status": plan.status.to_string(),
        "objective": plan.objective,
        "schedule": schedule,
        "summary": summary,
    })
}

/// Export JSON du plan (jolie mise en forme)
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let data = serde_json::to_vec_pretty(&plan_to_json(plan))?;
    write_atomic(path.as_ref(), &data)
}

fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_grid_parses() {
        let grid = parse_grid(SAMPLE_GRID, &GridFormat::default()).unwrap();
        assert_eq!(grid.persons().len(), 8);
        assert_eq!(grid.dates().len(), 11);
        assert_eq!(grid.dates()[10].as_str(), "31");
        // "Ρ" grec n'est pas le jeton de disponibilité
        assert_eq!(grid.availability(0, 0), Availability::Unavailable);
        assert_eq!(grid.availability(0, 1), Availability::Available);
        for d in 0..grid.dates().len() {
            assert!(grid.available_count(d) >= 3);
        }
    }

    #[test]
    fn irregular_whitespace_is_tolerated() {
        let text = "name\t1   2\n\nana  .\t X \n bob\t. .\n";
        let grid = parse_grid(text, &GridFormat::default()).unwrap();
        assert_eq!(grid.persons()[1].as_str(), "bob");
        assert_eq!(grid.availability(0, 1), Availability::Unavailable);
        assert_eq!(grid.availability(1, 1), Availability::Available);
    }

    #[test]
    fn short_row_names_person_and_line() {
        let text = "name 1 2 3\nana . . .\nbob . .\n";
        let err = parse_grid(text, &GridFormat::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("bob"), "{msg}");
    }

    #[test]
    fn custom_placeholder() {
        let format = GridFormat {
            placeholder: "-".into(),
        };
        let grid = parse_grid("n 1\nana -\nbob .\n", &format).unwrap();
        assert!(grid.availability(0, 0).is_available());
        assert!(!grid.availability(1, 0).is_available());
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(parse_grid("", &GridFormat::default()).is_err());
        assert!(parse_grid("name 1 2\n", &GridFormat::default()).is_err());
        assert!(parse_grid("name\nana\n", &GridFormat::default()).is_err());
    }
}
