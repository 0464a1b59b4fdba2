use std::path::{Path, PathBuf};

use crate::cli::{prepare, InputArgs};
use crate::error::Result;
use crate::export::{write_csv, write_xml, ExportFormat};
use crate::fmt::brl;
use crate::renderer::render;
use crate::settings::shellexpand_path;

fn default_stem() -> String {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    format!("pedido-compra-{date}")
}

fn write_artifact(bytes: &[u8], path: &Path) -> Result<()> {
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn run(
    input: &InputArgs,
    format: ExportFormat,
    output_dir: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let prepared = prepare(input)?;
    if prepared.records.is_empty() {
        tracing::warn!("fee report produced no purchase-order lines");
    }

    let dir: PathBuf = shellexpand_path(output_dir.as_deref().unwrap_or(&prepared.settings.output_dir));
    std::fs::create_dir_all(&dir)?;
    let stem = name.unwrap_or_else(default_stem);
    let rendered = render(&prepared.records, &prepared.schema)?;

    if format.includes_csv() {
        let mut buf = Vec::new();
        write_csv(&prepared.records, &prepared.schema, &mut buf)?;
        write_artifact(&buf, &dir.join(format!("{stem}.csv")))?;
    }
    if format.includes_xml() {
        let mut buf = Vec::new();
        write_xml(&prepared.records, &prepared.schema, &mut buf)?;
        write_artifact(&buf, &dir.join(format!("{stem}.xml")))?;
    }

    println!("{} line(s), total {}", rendered.rows.len(), brl(rendered.total));
    Ok(())
}
