mod compose;
mod core;
mod group;
mod hook;
mod instance;
mod parameter;
mod registry;

pub use self::core::*;
pub use compose::*;
pub use group::*;
pub use hook::*;
pub use instance::*;
pub use parameter::*;
pub use registry::*;
