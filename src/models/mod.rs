mod article;
mod eligibility;
mod marks;
mod status;

pub use article::*;
pub use eligibility::*;
pub use marks::*;
pub use status::*;
