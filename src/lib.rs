//! Pet Hatchery: an incremental clicker with pets, eggs, worlds and rebirth.
//!
//! The crate holds the economy and progression engine only. Rendering,
//! input plumbing and sound live in the host.

pub mod games;
pub mod time;

pub use games::pets::PetGame;
pub use games::Game;
