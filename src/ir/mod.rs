//! Intermediate representation: the flat key table built from inputs.
pub mod table;
