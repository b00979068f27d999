pub mod company;
pub mod declaration;
pub mod lenient;
pub mod record;
pub mod summary;
pub mod user;

pub use company::*;
pub use declaration::*;
pub use record::*;
pub use summary::*;
pub use user::*;
