// Treemarks services
// Stateless building blocks: codec, normalization, merge, settings, tag suggestion, link probing.

pub mod link_checker;
pub mod merge_engine;
pub mod netscape_codec;
pub mod settings_engine;
pub mod tag_suggester;
pub mod url_normalizer;
