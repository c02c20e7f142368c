//! Game trait shared by the games hosted in this crate.

pub mod pets;

/// Trait that all games implement.
pub trait Game {
    /// Advance timers and continuous accrual to the monotonic timestamp `now_ms`.
    fn tick(&mut self, now_ms: f64);

    /// Serialize the persistent part of the game into a save blob.
    fn save_blob(&self) -> Result<String, pets::error::SaveError>;
}
