pub mod cache;
pub mod drawing;
pub mod rasterizer;

pub use cache::RouteCache;
pub use drawing::{DrawingImage, ImageSize};
pub use rasterizer::rasterize;
