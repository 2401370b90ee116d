use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use pandemic_cli::pipeline::RunOutcome;
use pandemic_core::data_utils::any_to_string;
use pandemic_ingest::{DatasetCheck, DoctorReport};
use polars::prelude::DataFrame;

pub fn print_run_summary(outcome: &RunOutcome) {
    println!("Pipeline: {}", outcome.pipeline);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Node"),
        header_cell("Dataset"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("ms"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for run in &outcome.report.nodes {
        for (idx, shape) in run.outputs.iter().enumerate() {
            let (node, duration) = if idx == 0 {
                (Cell::new(&run.node), Cell::new(run.duration_ms))
            } else {
                (dim_cell(""), dim_cell(""))
            };
            table.add_row(vec![
                node,
                Cell::new(&shape.name),
                Cell::new(shape.rows),
                Cell::new(shape.columns),
                duration,
            ]);
        }
    }
    println!("{table}");

    if let Some(quality) = &outcome.quality {
        println!("Data quality:");
        println!("{}", frame_table(quality));
    }
    if outcome.written.is_empty() {
        println!("Dry run: nothing written ({} ms)", outcome.elapsed_ms);
    } else {
        println!(
            "Wrote {} datasets ({} ms)",
            outcome.written.len(),
            outcome.elapsed_ms
        );
        for path in &outcome.written {
            println!("  {}", path.display());
        }
    }
}

pub fn print_doctor_report(report: &DoctorReport) {
    println!("Data directory: {}", report.data_dir);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Status"),
        header_cell("Size MB"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Countries"),
        header_cell("Dates"),
        header_cell("Missing required"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for check in &report.datasets {
        table.add_row(vec![
            Cell::new(&check.dataset),
            status_cell(check),
            optional_cell(check.size_mb.map(|mb| format!("{mb:.2}"))),
            Cell::new(check.sampled_rows),
            Cell::new(check.columns),
            Cell::new(check.n_countries),
            optional_cell(date_range(check)),
            if check.missing_required.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(check.missing_required.join(", ")).fg(Color::Red)
            },
        ]);
    }
    println!("{table}");
    for check in &report.datasets {
        if let Some(error) = &check.error {
            eprintln!("{}: {error}", check.dataset);
        }
        if !check.top_missing.is_empty() {
            println!(
                "{} columns with missing values (top {}):",
                check.dataset,
                check.top_missing.len()
            );
            for missing in &check.top_missing {
                println!("  {}: {}%", missing.column, missing.missing_pct);
            }
        }
    }
}

pub fn print_pipelines<'a>(pipelines: impl IntoIterator<Item = (&'a str, Vec<&'a str>)>) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Pipeline"), header_cell("Nodes")]);
    apply_table_style(&mut table);
    for (name, nodes) in pipelines {
        table.add_row(vec![Cell::new(name), Cell::new(nodes.join("\n"))]);
    }
    println!("{table}");
}

/// Render every cell of a small frame.
pub fn frame_table(df: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for idx in 0..df.height() {
        let row: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| match column.get(idx) {
                Ok(value) if !value.is_null() => Cell::new(any_to_string(value)),
                _ => dim_cell("-"),
            })
            .collect();
        table.add_row(row);
    }
    table
}

fn date_range(check: &DatasetCheck) -> Option<String> {
    match (&check.date_min, &check.date_max) {
        (Some(min), Some(max)) => Some(format!("{min} to {max}")),
        _ => None,
    }
}

fn status_cell(check: &DatasetCheck) -> Cell {
    if !check.exists {
        Cell::new("missing").fg(Color::Red).add_attribute(Attribute::Bold)
    } else if check.passed() {
        Cell::new("ok").fg(Color::Green)
    } else {
        Cell::new("failed").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn optional_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
