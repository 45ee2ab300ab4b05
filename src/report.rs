use crate::scheduler::{ScheduleTable, SummaryTable};

/// Permet de customiser le rendu des tableaux (texte, markdown, etc.).
pub trait TableRenderer {
    fn render_schedule(&self, schedule: &ScheduleTable) -> String;
    fn render_summary(&self, summary: &SummaryTable) -> String;
}

/// Rendu texte aligné, une colonne par rôle.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TableRenderer for TextRenderer {
    fn render_schedule(&self, schedule: &ScheduleTable) -> String {
        let mut header = vec!["Date".to_string()];
        header.extend(schedule.roles().iter().map(|r| r.as_str().to_string()));
        let rows = schedule
            .rows()
            .iter()
            .map(|row| {
                let mut cells = vec![row.date.as_str().to_string()];
                cells.extend(row.assignees.iter().map(|p| p.as_str().to_string()));
                cells
            })
            .collect::<Vec<_>>();
        render_grid(&header, &rows)
    }

    fn render_summary(&self, summary: &SummaryTable) -> String {
        let mut header = vec!["Person".to_string()];
        header.extend(summary.roles().iter().map(|r| format!("tel {r}")));
        header.push("total".to_string());
        let rows = summary
            .rows()
            .iter()
            .map(|row| {
                let mut cells = vec![row.person.as_str().to_string()];
                cells.extend(row.counts.iter().map(u32::to_string));
                cells.push(row.total().to_string());
                cells
            })
            .collect::<Vec<_>>();
        render_grid(&header, &rows)
    }
}

fn render_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| {
            let pad = w.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
