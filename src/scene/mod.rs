pub(crate) mod page;
pub(crate) mod selector;
pub(crate) mod split;
pub(crate) mod tree;
