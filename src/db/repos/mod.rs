mod articles;
mod marks;

pub use articles::*;
pub use marks::*;
