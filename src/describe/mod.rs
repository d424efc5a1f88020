//! Described queries: result rows plus per-column field descriptions.

mod descriptions;
mod provenance;
mod screens;
mod translator;
pub use descriptions::*;
pub use provenance::*;
pub use screens::Screen;
pub use translator::*;
