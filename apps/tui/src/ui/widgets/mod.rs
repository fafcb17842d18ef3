pub mod hints;
pub mod map_canvas;
pub mod popup;
pub mod status;
pub mod tables;
