pub(crate) mod hydrate;
pub(crate) mod pool;
pub(crate) mod project;
