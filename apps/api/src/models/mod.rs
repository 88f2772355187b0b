pub mod resume;
pub mod rows;
