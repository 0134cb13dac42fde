use crate::data::{EventCatalog, Persistable};
use anyhow::Result;
use std::path::Path;

pub fn run(data_dir: &Path) -> Result<()> {
    let catalog = EventCatalog::load_from(data_dir)?;
    write_events(&catalog, &mut std::io::stdout())
}

pub(crate) fn write_events<W: std::io::Write>(catalog: &EventCatalog, out: &mut W) -> Result<()> {
    writeln!(out, "Events")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<4} {:<28} {:<26} {:>6} {:>8}", "Id", "Title", "Date", "Covers", "Gallery")?;
    for e in &catalog.events {
        writeln!(
            out,
            "  {:<4} {:<28} {:<26} {:>6} {:>8}",
            e.id,
            e.title,
            e.display_date().unwrap_or("-"),
            e.cover_images.len(),
            e.gallery_images.len()
        )?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} event(s)", catalog.len())?;
    if let Err(e) = catalog.validate() {
        writeln!(out, "Warning: {e}")?;
    }
    Ok(())
}
