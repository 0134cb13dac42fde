use crate::calc::CardMetrics;
use anyhow::Result;

pub fn run(width: f32) -> Result<()> {
    write_layout(width, &mut std::io::stdout())
}

pub(crate) fn write_layout<W: std::io::Write>(width: f32, out: &mut W) -> Result<()> {
    let m = CardMetrics::for_viewport(width);
    writeln!(out, "Viewport   {:>8.1} px", m.viewport_width)?;
    writeln!(out, "Card       {:>8.1} px", m.card_width)?;
    writeln!(out, "Gap        {:>8.1} px", m.gap)?;
    writeln!(out, "Stride     {:>8.1} px", m.stride())?;
    Ok(())
}
