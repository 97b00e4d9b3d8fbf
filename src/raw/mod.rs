mod arena;
mod degree;
mod handle;
mod node;
mod raw_mdbtree_set;

pub(crate) use degree::Degree;
pub(crate) use raw_mdbtree_set::RawMDBTreeSet;
