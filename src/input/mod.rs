//! Static inputs: the nested translation dictionary.
pub mod dictionary;
