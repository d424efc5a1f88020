//! Domain workflows on profiles, rights and users.

mod profile;
pub use profile::*;
