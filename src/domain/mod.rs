pub mod note;
pub mod search;

pub use note::*;
pub use search::*;
