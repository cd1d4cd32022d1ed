pub mod types;
pub mod catalog;
pub mod timeline;
pub mod content;
pub mod annotated;
pub mod exercise;
pub mod print;
pub mod route;

pub use types::{AnalysisStep, Catalog, PageEntry};
pub use catalog::load_catalog;
pub use content::{load_content_dir, AnalysisContent, ContentRegistry};
pub use exercise::{Exercise, Rating};
pub use print::PrintSheet;
pub use route::Route;
