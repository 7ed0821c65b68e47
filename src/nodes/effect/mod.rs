mod gain;
mod mixer;

pub use gain::*;
pub use mixer::*;
