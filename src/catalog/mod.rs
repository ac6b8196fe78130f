//! Media tree model, its JSON document form, and the two tree walks that
//! drive the viewer: filtering and option extraction.

pub mod document;
pub mod filter;
pub mod node;
pub mod options;

pub use document::{load_document, parse_document, DocumentError};
pub use filter::{filter_tree, FilterCriteria};
pub use node::{count_files, MediaFile, MediaNode};
pub use options::{extract_options, FilterOptions};
