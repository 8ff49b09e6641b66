pub mod directions;
pub mod plan;
pub mod run;
