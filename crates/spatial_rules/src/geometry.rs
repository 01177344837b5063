pub mod bbox;
pub mod polygon;

pub use bbox::BBox;
pub use polygon::Polygon;
