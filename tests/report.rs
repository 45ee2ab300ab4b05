#![forbid(unsafe_code)]
use fireshifts::scheduler::{ScheduleRow, ScheduleTable, SummaryTable};
use fireshifts::{DateLabel, PersonId, Role, TableRenderer, TextRenderer};

fn schedule() -> (ScheduleTable, Vec<PersonId>) {
    let persons: Vec<PersonId> = ["ana", "bob", "carla"].iter().map(PersonId::new).collect();
    let rows = vec![
        ScheduleRow {
            date: DateLabel::new("1"),
            assignees: vec![persons[0].clone(), persons[1].clone()],
        },
        ScheduleRow {
            date: DateLabel::new("10"),
            assignees: vec![persons[2].clone(), persons[0].clone()],
        },
    ];
    (ScheduleTable::new(vec![Role::new("A"), Role::new("B")], rows), persons)
}

#[test]
fn schedule_renders_as_aligned_text() {
    let (schedule, _) = schedule();
    let out = TextRenderer.render_schedule(&schedule);
    insta::assert_snapshot!(out.trim_end(), @r"
Date | A     | B
---- | ----- | ---
1    | ana   | bob
10   | carla | ana
");
}

#[test]
fn summary_renders_counts_and_total() {
    let (schedule, persons) = schedule();
    let summary = SummaryTable::from_schedule(&schedule, &persons);
    let out = TextRenderer.render_summary(&summary);
    insta::assert_snapshot!(out.trim_end(), @r"
Person | tel A | tel B | total
------ | ----- | ----- | -----
ana    | 1     | 1     | 2
bob    | 0     | 1     | 1
carla  | 1     | 0     | 1
");
}
