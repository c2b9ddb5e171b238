//! # Revenant Common
//!
//! Shared foundational types for the Revenant behavior toolkit:
//! - Entity identity (`EntityId`)
//! - Collision layer masks (`LayerMask`)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_layer_mask_overlap() {
        let player = LayerMask::layer(3);
        let world = LayerMask::layer(0);

        assert!(player.contains(player));
        assert!(!player.contains(world));
        assert!(player.union(world).contains(world));
    }
}
