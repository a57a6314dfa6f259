//! Plain-text rendering of the users grid.

use user_admin_core::{ColumnKind, FieldErrors, GridRow, COLUMNS};

/// Id column first, then every data column in grid order.
pub fn render_grid(rows: &[GridRow]) -> String {
    let mut headers = vec!["Id".to_string()];
    headers.extend(
        COLUMNS
            .iter()
            .filter(|c| c.kind != ColumnKind::Actions)
            .map(|c| c.header.to_string()),
    );

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.clone(),
                row.name.clone(),
                row.address.clone(),
                if row.is_male { "yes" } else { "no" }.to_string(),
                row.phone.clone(),
                row.birthday
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|cells| cells[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    if rows.is_empty() {
        out.push_str("(no users)\n");
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn render_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {message}\n", field.label()))
        .collect()
}
