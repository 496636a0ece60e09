pub mod region_view;

pub use region_view::*;
