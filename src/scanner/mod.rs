pub mod heuristic;
pub mod narrower;
