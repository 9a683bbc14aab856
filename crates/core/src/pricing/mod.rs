pub mod cart;
pub mod rules;
pub mod summary;
