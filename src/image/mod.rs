//! Product image resolution with a placeholder fallback.
//!
//! A [`ProductImage`] turns an optional image URL into a display URL plus
//! loading and error flags. URLs are probed over HTTP before being shown, and
//! the ones that load are remembered in an [`ImageCache`] so later lookups skip
//! the network.

pub mod cache;
pub mod probe;
pub mod resolver;

pub use cache::ImageCache;
pub use probe::{HttpImageProbe, ImageProbe, ProbeError};
pub use resolver::{ImageState, ProductImage};
