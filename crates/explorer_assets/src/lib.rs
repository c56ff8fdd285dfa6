//! Tour documents: parsing, validation, lookup and background loading.

pub mod asset_events;
pub mod asset_server;
pub mod assets;
pub mod error;
pub mod scene;
pub mod tiles;
pub mod tour;

pub use asset_events::{AssetEvent, AssetLookup};
pub use asset_server::{AssetServer, read_tour_file};
pub use assets::Handle;
pub use error::{AssetError, TourError};
pub use scene::{InfoHotspot, Level, LinkHotspot, Scene};
pub use tour::{
    MouseViewMode, SceneIndex, Tour, TourDocument, TourSettings, load_tour, load_tour_script,
};
