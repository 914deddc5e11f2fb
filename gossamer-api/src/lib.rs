//! Public API of Gossamer: the [`Value`] model, [`NodeID`]/[`EdgeID`],
//! the [`Storage`] contract and its error taxonomy, and the entity
//! façade that any [`Storage`] implementation can be wrapped in.

pub mod entity;
pub mod error;
pub mod ids;
pub mod storage;
pub mod value;

pub use entity::{derived_property_name, Entity, EnumBinding, NullablePropertyBinding, PropertyBinding, PropertyEnum, RESERVED_PREFIX};
pub use error::{Result, StorageError};
pub use ids::{EdgeID, IdParseError, NodeID};
pub use storage::{PropertyMap, PropertyPatch, Storage};
pub use value::{FromValueVariant, Value};
