/// Minimum degree of a tree, fixed at construction.
///
/// A tree of minimum degree `t` keeps between `t - 1` and `2t - 1` keys in
/// every non-root node and between `t` and `2t` children in every internal
/// node. `t >= 2` is the smallest degree for which those ranges are
/// non-degenerate; `Degree::new` rejects anything below it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Degree(usize);

impl Degree {
    /// Smallest permitted minimum degree. `t == 2` is a 2-3-4 tree.
    pub(crate) const FLOOR: usize = 2;

    #[inline]
    pub(crate) const fn new(t: usize) -> Option<Self> {
        if t >= Self::FLOOR { Some(Self(t)) } else { None }
    }

    #[inline]
    pub(crate) const fn get(self) -> usize {
        self.0
    }

    /// Key capacity of every node: `2t - 1`.
    #[inline]
    pub(crate) const fn max_keys(self) -> usize {
        2 * self.0 - 1
    }

    /// Key floor of every non-root node: `t - 1`.
    #[inline]
    pub(crate) const fn min_keys(self) -> usize {
        self.0 - 1
    }

    /// Child capacity of every internal node: `2t`.
    #[inline]
    pub(crate) const fn max_children(self) -> usize {
        2 * self.0
    }
}
