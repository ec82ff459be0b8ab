// Treemarks tree engine
// Pure, in-memory transforms of the bookmark tree. Persistence is the caller's job.

pub mod tree_ops;
