// Treemarks state managers
// The bookmark manager owns the document store and serializes mutations.

pub mod bookmark_manager;
