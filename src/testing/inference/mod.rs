pub mod parametric;
