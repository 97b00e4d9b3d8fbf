use core::num::NonZero;

/// Position of a node in the arena.
///
/// Stored one-based: slot `i` is encoded as `i + 1`, leaving the zero bit
/// pattern free so that `Option<Handle>` packs into the same four bytes as
/// `Handle` itself. The tree leans on that everywhere handles are optional:
/// the arena's vacant-slot chain, and the child that may or may not ride
/// along when a key transfers between siblings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<u32>);

impl Handle {
    /// Highest slot position the encoding can express. One `Handle` per
    /// node, so this is also the ceiling on a single tree's node count.
    pub(crate) const LIMIT: usize = u32::MAX as usize - 1;

    /// Encodes a slot position, or `None` past [`Self::LIMIT`].
    #[inline]
    pub(crate) fn checked(index: usize) -> Option<Self> {
        let shifted = u32::try_from(index.checked_add(1)?).ok()?;
        NonZero::new(shifted).map(Self)
    }

    /// Decodes back to the slot position.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}
