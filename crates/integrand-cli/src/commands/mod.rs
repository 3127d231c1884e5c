pub mod degree_check;
pub mod latex;
pub mod registry;
pub mod resolve;
pub mod show;
