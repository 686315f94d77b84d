//! Trait definitions

mod locate;
mod region;

pub use locate::Locate;
pub use region::Region;
