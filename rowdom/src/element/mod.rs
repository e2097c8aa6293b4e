mod dom;
mod node;

pub use dom::Dom;
pub use node::{Element, NodeId};
