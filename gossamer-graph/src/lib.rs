//! The graph façade (C8): [`SimpleGraph`] and [`MultiGraph`] over any
//! [`gossamer_api::Storage`] backend, with [`Node`]/[`Edge`] entity
//! handles and lazy one-hop and multi-hop traversals.

mod core;
mod entity;
mod error;
mod multi;
mod simple;

pub use core::{Ancestors, Descendants, EdgePredicate};
pub use entity::{Edge, Node};
pub use error::{GraphError, Result};
pub use multi::MultiGraph;
pub use simple::SimpleGraph;
