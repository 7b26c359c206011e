pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::{SeqGenerator, SeqGeneratorError};

use pocketlink_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage:
/// the engine checks each candidate against the stored records and asks
/// again on a collision.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate, or `None` once the generator has no
    /// codes left. Candidates should satisfy the short code format.
    fn generate(&self) -> Option<ShortCode>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self) -> Option<ShortCode> {
        (**self).generate()
    }
}
