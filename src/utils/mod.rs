pub mod hash;
pub mod leaf;
