//! Core business entities.

mod click;
mod link;

pub use click::{Click, DIRECT_REFERRER, DeviceClass, NewClick};
pub use link::{Link, LinkStatus, NewLink};
