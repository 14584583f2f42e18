pub mod geo;
pub mod run;
