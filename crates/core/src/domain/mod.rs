pub mod catalog;
pub mod customer;
pub mod quotation;
pub mod series;
