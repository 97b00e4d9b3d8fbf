use core::borrow::Borrow;
use core::fmt;

use thiserror::Error;

use crate::raw::{Degree, RawMDBTreeSet};

/// Errors surfaced by [`MDBTreeSet`] operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested key is not in the set.
    #[error("key not found")]
    KeyNotFound,
    /// A constructor was given a minimum degree below 2.
    #[error("minimum degree must be at least 2, got {0}")]
    InvalidMinDegree(usize),
}

/// An ordered set backed by a classical B-tree with a runtime-chosen
/// minimum degree.
///
/// The minimum degree `t` fixes every node's capacity at construction:
/// non-root nodes hold between `t - 1` and `2t - 1` keys, internal nodes
/// between `t` and `2t` children, and all leaves sit at the same depth.
/// Search, insert, and remove each make a single root-to-leaf pass -
/// inserts split full nodes on the way down, removes thicken minimum-size
/// nodes on the way down - so no operation ever revisits a node it has
/// already left.
///
/// Inserting a key that compares equal to a stored key overwrites the
/// stored key and returns it; the set never holds duplicates. It is a
/// logic error for a key to be modified in such a way that its ordering
/// relative to any other key, as determined by the [`Ord`] trait, changes
/// while it is in the set.
///
/// # Examples
///
/// ```
/// use kiri_tree::MDBTreeSet;
///
/// // A minimum degree of 2 is a 2-3-4 tree; larger degrees trade depth
/// // for wider nodes.
/// let mut primes = MDBTreeSet::new(2).unwrap();
///
/// primes.insert(5);
/// primes.insert(2);
/// primes.insert(3);
///
/// assert_eq!(primes.len(), 3);
/// assert!(primes.contains(&3));
/// assert_eq!(primes.remove(&5), Ok(5));
/// assert!(primes.search(&5).is_err());
/// ```
pub struct MDBTreeSet<K> {
    raw: RawMDBTreeSet<K>,
}

impl<K> MDBTreeSet<K> {
    /// Creates an empty set with the given minimum degree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinDegree`] if `min_degree` is below 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiri_tree::{Error, MDBTreeSet};
    ///
    /// let set: MDBTreeSet<i32> = MDBTreeSet::new(16).unwrap();
    /// assert!(set.is_empty());
    ///
    /// assert_eq!(MDBTreeSet::<i32>::new(1).unwrap_err(), Error::InvalidMinDegree(1));
    /// ```
    pub fn new(min_degree: usize) -> Result<Self, Error> {
        let degree = Degree::new(min_degree).ok_or(Error::InvalidMinDegree(min_degree))?;
        Ok(Self {
            raw: RawMDBTreeSet::new(degree),
        })
    }

    /// Creates an empty set with the given minimum degree and node storage
    /// pre-allocated for at least `capacity` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinDegree`] if `min_degree` is below 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiri_tree::MDBTreeSet;
    ///
    /// let set: MDBTreeSet<i32> = MDBTreeSet::with_capacity(4, 1_000).unwrap();
    /// assert!(set.capacity() >= 1_000);
    /// ```
    pub fn with_capacity(min_degree: usize, capacity: usize) -> Result<Self, Error> {
        let degree = Degree::new(min_degree).ok_or(Error::InvalidMinDegree(min_degree))?;
        Ok(Self {
            raw: RawMDBTreeSet::with_capacity(degree, capacity),
        })
    }

    /// Returns the minimum degree the set was constructed with.
    #[must_use]
    pub fn min_degree(&self) -> usize {
        self.raw.degree().get()
    }

    /// Returns the number of keys the pre-allocated node storage can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of keys in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiri_tree::MDBTreeSet;
    ///
    /// let mut set = MDBTreeSet::new(2).unwrap();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Removes every key from the set. Keeps the degree, drops the nodes.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord> MDBTreeSet<K> {
    /// Returns the stored key equal to `key`.
    ///
    /// The key may be any borrowed form of the set's key type, with
    /// matching `Ord` behavior on the borrowed form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no equal key is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiri_tree::{Error, MDBTreeSet};
    ///
    /// let mut set = MDBTreeSet::new(2).unwrap();
    /// set.insert(String::from("fern"));
    ///
    /// assert_eq!(set.search("fern"), Ok(&String::from("fern")));
    /// assert_eq!(set.search("moss"), Err(Error::KeyNotFound));
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Result<&K, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the stored key equal to `key`, or `None` if absent.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns `true` if the set contains a key equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiri_tree::MDBTreeSet;
    ///
    /// let mut set = MDBTreeSet::new(3).unwrap();
    /// set.insert(7);
    /// assert!(set.contains(&7));
    /// assert!(!set.contains(&8));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).is_some()
    }

    /// Adds `key` to the set.
    ///
    /// If a stored key compares equal, it is overwritten in place and
    /// returned; the set's length does not change. Otherwise `None` is
    /// returned and the length grows by one. Insertion never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiri_tree::MDBTreeSet;
    ///
    /// let mut set = MDBTreeSet::new(2).unwrap();
    /// assert_eq!(set.insert(5), None);
    /// assert_eq!(set.insert(5), Some(5));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> Option<K> {
        self.raw.insert(key)
    }

    /// Removes the stored key equal to `key` and returns it.
    ///
    /// On a miss the key set is untouched, although nodes on the descent
    /// path may have been rebalanced; the set's contents and length never
    /// change on the error path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no equal key is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiri_tree::{Error, MDBTreeSet};
    ///
    /// let mut set = MDBTreeSet::new(2).unwrap();
    /// set.insert(4);
    ///
    /// assert_eq!(set.remove(&4), Ok(4));
    /// assert_eq!(set.remove(&4), Err(Error::KeyNotFound));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Result<K, Error>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).ok_or(Error::KeyNotFound)
    }
}

impl<K: fmt::Debug> fmt::Debug for MDBTreeSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = f.debug_set();
        self.raw.for_each_in_order(|key| {
            entries.entry(key);
        });
        entries.finish()
    }
}

impl<K: Clone> Clone for MDBTreeSet<K> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Ord> Extend<K> for MDBTreeSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
