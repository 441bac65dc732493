mod adapter;
mod interface;
mod middleware;
mod report;

pub use adapter::*;
pub use interface::*;
pub use middleware::*;
pub use report::*;

#[cfg(test)]
pub(crate) use interface::util;
