pub mod catalog;
pub mod membership;
pub mod pricing;
