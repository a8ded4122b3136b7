pub mod calculator;
pub mod complexity;
pub mod discount;
pub mod engagement;
pub mod formula;
pub mod validation;
