//! Board layouts: text format, seeded generation and match setup

pub mod game_init;
pub mod generator;
pub mod layout;

pub use game_init::MatchInitializer;
pub use generator::{autominers_per_side, generate_layout};
pub use layout::Layout;
