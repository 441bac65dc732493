mod bind;
mod coerce;
mod failure;

pub use bind::*;
pub(crate) use coerce::coerce;
pub use coerce::check_type;
pub use failure::*;
