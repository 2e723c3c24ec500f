pub(crate) mod step;
pub(crate) mod storyboard;
#[allow(clippy::module_inception)]
pub(crate) mod timeline;
