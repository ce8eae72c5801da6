pub mod chain;
pub mod dim;
pub mod grid;
pub mod iter;
pub mod matrix;
pub mod solve;
pub mod sparse;
pub mod vector;
pub mod view;
