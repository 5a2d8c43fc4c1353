pub mod selector;
pub mod types;

pub use selector::{ModelSelector, SelectionIssue};
pub use types::{ModelDescriptor, ModelList, Settings};
