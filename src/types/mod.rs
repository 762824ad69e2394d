pub mod feed;
pub mod quadrant;
pub mod quadrant_year_frame;
