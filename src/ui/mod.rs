pub mod counts;
pub mod panels;
