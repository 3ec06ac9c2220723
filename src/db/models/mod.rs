mod assignment;
mod category;
mod company;
mod submission;
mod test;
mod user;

pub use assignment::*;
pub use category::*;
pub use company::*;
pub use submission::*;
pub use test::*;
pub use user::*;
