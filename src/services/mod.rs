pub mod asset_classifier;
pub mod geolocation;
pub mod page_store;
pub mod result_generator;

pub use asset_classifier::AssetClassifier;
pub use geolocation::{Geolocator, MockGeolocator};
pub use page_store::PageStore;
pub use result_generator::{MockGenerator, ResultGenerator};
