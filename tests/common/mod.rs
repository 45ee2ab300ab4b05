#![allow(dead_code)]
use fireshifts::{Availability, AvailabilityGrid, DateLabel, PersonId, Plan, Role, SummaryTable};

pub fn grid_from(rows: &[&str]) -> AvailabilityGrid {
    // chaque ligne : un caractère par date, '.' = disponible
    let persons = (0..rows.len()).map(|i| PersonId::new(format!("p{i}"))).collect();
    let dates = (0..rows[0].len()).map(|d| DateLabel::new(format!("{}", d + 1))).collect();
    let cells = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| if c == '.' { Availability::Available } else { Availability::Unavailable })
                .collect()
        })
        .collect();
    AvailabilityGrid::new(persons, dates, cells).unwrap()
}

pub fn all_available(persons: usize, dates: usize) -> AvailabilityGrid {
    let row = ".".repeat(dates);
    let rows: Vec<&str> = (0..persons).map(|_| row.as_str()).collect();
    grid_from(&rows)
}

/// Vérifie toutes les propriétés d'un plan résolu.
pub fn assert_invariants(grid: &AvailabilityGrid, roles: &[Role], plan: &Plan) {
    let persons = grid.persons();
    let schedule = &plan.schedule;
    assert_eq!(schedule.rows().len(), grid.dates().len());

    for (d, row) in schedule.rows().iter().enumerate() {
        assert_eq!(row.date, grid.dates()[d], "dates keep their order");
        // couverture : une personne par rôle
        assert_eq!(row.assignees.len(), roles.len());
        // exclusivité : au plus un rôle par personne et par date
        for (i, a) in row.assignees.iter().enumerate() {
            assert!(
                row.assignees.iter().skip(i + 1).all(|b| b != a),
                "{a} holds two roles on {}",
                row.date
            );
            let p = grid.find_person(a.as_str()).unwrap();
            assert!(
                grid.availability(p, d).is_available(),
                "{a} assigned while unavailable on {}",
                row.date
            );
        }
    }

    let slots = grid.dates().len() * roles.len();
    let min = (slots / persons.len()) as u32;
    let max = if slots % persons.len() == 0 { min } else { min + 1 };
    for row in plan.summary.rows() {
        let total = row.total();
        assert!(min <= total && total <= max, "{} has {total}, expected [{min}, {max}]", row.person);
        for a in &row.counts {
            for b in &row.counts {
                assert!(a.abs_diff(*b) <= 1, "{} role counts unbalanced: {:?}", row.person, row.counts);
            }
        }
    }

    let recount = SummaryTable::from_schedule(schedule, persons);
    assert_eq!(recount, plan.summary);

    let totals: Vec<u32> = plan.summary.rows().iter().map(|r| r.total()).collect();
    let spread = totals.iter().max().unwrap() - totals.iter().min().unwrap();
    assert_eq!(plan.objective, Some(i64::from(spread)));
}
