use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{prepare, InputArgs};
use crate::error::Result;
use crate::fmt::decimal_br;
use crate::renderer::render;

pub fn run(input: &InputArgs, wide: bool) -> Result<()> {
    let prepared = prepare(input)?;
    let rendered = render(&prepared.records, &prepared.schema)?;

    let mut table = Table::new();
    if wide {
        table.set_header(rendered.headers.clone());
        for row in &rendered.rows {
            table.add_row(row.cells.clone());
        }
    } else {
        table.set_header(vec!["CodCentroCustos", "Estabelecimento", "VlrUnitario"]);
        for (record, row) in prepared.records.iter().zip(&rendered.rows) {
            let cost_center = if record.cost_center.is_empty() {
                Cell::new("(sem centro)".yellow())
            } else {
                Cell::new(&record.cost_center)
            };
            table.add_row(vec![
                cost_center,
                Cell::new(&row.establishment),
                Cell::new(decimal_br(record.amount)),
            ]);
        }
    }

    println!("{}\n{table}", "Resultado Final".bold());
    println!(
        "{} {}",
        "Total Geral de Taxas:".bold(),
        rendered.total_label.green().bold()
    );

    let unmatched = prepared.records.iter().filter(|r| r.cost_center.is_empty()).count();
    if unmatched > 0 {
        println!(
            "{}",
            format!("{unmatched} line(s) without a cost center").yellow()
        );
    }
    Ok(())
}
