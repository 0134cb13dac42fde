use crate::data::{AssetCache, AssetDir, EventCatalog, KioskSettings, Persistable};
use crate::kiosk::Kiosk;
use crate::ui::kiosk_view::{App, Exit, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

pub fn run(data_dir: &Path) -> Result<()> {
    let settings = KioskSettings::load_from(data_dir)?;
    let catalog = EventCatalog::load_from(data_dir)?;
    catalog
        .validate()
        .with_context(|| format!("invalid catalog in {}", data_dir.display()))?;
    let asset_dir = settings.resolved_asset_dir(data_dir);
    info!(events = catalog.len(), assets = %asset_dir.display(), "starting kiosk");

    let kiosk = Kiosk::new(catalog, settings.timings, Instant::now())?;
    let assets = AssetCache::new(Box::new(AssetDir::new(asset_dir)));

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        );
        error!("kiosk panicked: {info}");
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let columns = terminal.size()?.width;
    let mut app = App::new(kiosk, settings, assets, columns);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    match result? {
        Exit::Navigate(destination) => {
            info!(%destination, "kiosk handed over");
            println!("{destination}");
        }
        Exit::Quit => info!("kiosk closed"),
    }
    Ok(())
}
