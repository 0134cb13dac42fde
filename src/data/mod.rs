pub mod assets;
pub mod event;
pub mod persistence;
pub mod settings;

pub use assets::{AssetCache, AssetDir};
pub use event::{Event, EventCatalog, EventId};
pub use persistence::Persistable;
pub use settings::{KioskSettings, Timings};
