pub mod highlight;
pub mod placement;
