pub mod python;
pub mod python_gen;
