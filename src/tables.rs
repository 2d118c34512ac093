use std::fmt::Write;

use comfy_table::{Attribute, Cell, Table, modifiers, presets};

use crate::core::{TimeOfDay, Timeline};

pub fn build_timeline_table(timeline: &Timeline, now: TimeOfDay) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Interval", "Status", ""]);
    for (label, status) in timeline.iter() {
        let is_now = label.start_hour() == now.hour;
        let mut label_cell = Cell::new(label);
        if label.start_hour() < now.hour {
            label_cell = label_cell.add_attribute(Attribute::Dim);
        }
        if is_now {
            label_cell = label_cell.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            label_cell,
            Cell::new(status).fg(status.color()),
            Cell::new(if is_now { "◀ now" } else { "" }),
        ]);
    }
    table
}

/// Tab-separated `interval<TAB>status` lines under the header.
pub fn render_tsv(timeline: &Timeline) -> String {
    timeline.iter().fold(String::from("Interval\tStatus\n"), |mut output, (label, status)| {
        let _ = writeln!(output, "{label}\t{status}");
        output
    })
}
