pub mod action;
pub mod criteria;
pub mod grid;
pub mod row;
pub mod search;
