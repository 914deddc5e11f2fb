//! The entity façade (C3): a thin, storage-delegating handle shared by
//! nodes and edges. No property state lives on the handle itself — every
//! read and write goes straight through to the owning [`Storage`].

use std::collections::HashMap;

use crate::error::{Result, StorageError};
use crate::storage::{PropertyMap, PropertyPatch};
use crate::value::{FromValueVariant, Value};

/// Property names beginning with this prefix are reserved and rejected
/// by every entity-level mutator. The storage contract itself does not
/// enforce this — only the façade does (§4.2/§6).
pub const RESERVED_PREFIX: &str = "meta_";

fn check_prop_name(name: &str, entity_display: &str) -> Result<()> {
    if name.starts_with(RESERVED_PREFIX) {
        return Err(StorageError::InvalidPropName {
            name: name.to_string(),
            id: entity_display.to_string(),
        });
    }
    Ok(())
}

/// Shared contract for node and edge handles. `Entity::Id` is the
/// identifier type ([`crate::NodeID`] or [`crate::EdgeID`]); equality and
/// hashing for any concrete implementor must be by `id()` alone.
pub trait Entity {
    fn id_display(&self) -> String;
    fn type_name(&self) -> &'static str;

    /// Raw, unfiltered property read — used internally by the default
    /// accessor methods below.
    fn raw_get_all(&self) -> Result<PropertyMap>;
    /// Raw, unfiltered patch application — used internally.
    fn raw_set_patch(&self, patch: PropertyPatch) -> Result<()>;

    fn get_all_props(&self) -> Result<PropertyMap> {
        self.raw_get_all()
    }

    fn contains_prop(&self, name: &str) -> Result<bool> {
        Ok(self.raw_get_all()?.contains_key(name))
    }

    fn get_prop(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.raw_get_all()?.remove(name))
    }

    /// Returns the property if present and its runtime variant matches
    /// `T`; `None` on either absence or a type mismatch — never an error.
    fn get_typed<T: FromValueVariant>(&self, name: &str) -> Result<Option<T>> {
        Ok(self
            .get_prop(name)?
            .and_then(|v| T::from_value_variant(&v)))
    }

    /// Null deletes; any other value inserts or replaces. Rejects
    /// reserved property names.
    fn set_prop(&self, name: &str, value: Option<Value>) -> Result<()> {
        check_prop_name(name, &self.id_display())?;
        let mut patch = PropertyPatch::new();
        patch.insert(name.to_string(), value);
        self.raw_set_patch(patch)
    }

    fn set_props(&self, props: HashMap<String, Option<Value>>) -> Result<()> {
        for name in props.keys() {
            check_prop_name(name, &self.id_display())?;
        }
        self.raw_set_patch(props)
    }
}

/// A bound accessor over a single non-nullable property with a default.
///
/// Reads return `default` when the property is absent or its runtime
/// variant doesn't match `T`.
pub struct PropertyBinding<E, T> {
    entity: E,
    name: String,
    default: T,
}

impl<E: Entity, T: FromValueVariant + Clone> PropertyBinding<E, T> {
    pub fn new(entity: E, name: impl Into<String>, default: T) -> Self {
        Self {
            entity,
            name: name.into(),
            default,
        }
    }

    pub fn get(&self) -> Result<T> {
        Ok(self.entity.get_typed::<T>(&self.name)?.unwrap_or_else(|| self.default.clone()))
    }

    pub fn set(&self, value: T) -> Result<()> {
        self.entity.set_prop(&self.name, Some(value.into_value()))
    }
}

/// A bound accessor over a single nullable property.
///
/// Preserves a documented quirk (§9): writing the absent marker
/// (`set(None)`) is a no-op, not a delete — there is deliberately no way
/// to clear a property through this binding. Use [`Entity::set_prop`]
/// with an explicit `None` to delete.
pub struct NullablePropertyBinding<E, T> {
    entity: E,
    name: String,
    _marker: std::marker::PhantomData<T>,
}

impl<E: Entity, T: FromValueVariant> NullablePropertyBinding<E, T> {
    pub fn new(entity: E, name: impl Into<String>) -> Self {
        Self {
            entity,
            name: name.into(),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn get(&self) -> Result<Option<T>> {
        self.entity.get_typed::<T>(&self.name)
    }

    pub fn set(&self, value: Option<T>) -> Result<()> {
        match value {
            Some(v) => self.entity.set_prop(&self.name, Some(v.into_value())),
            None => Ok(()),
        }
    }
}

/// A Rust enum that can be bound to a single string-valued property via
/// [`EnumBinding`] — the typed-enum binding of §4.2.
pub trait PropertyEnum: Copy + Sized {
    /// The enum's own name, e.g. `"NodeKind"`. Used to derive the
    /// property name (`derived_property_name`) unless overridden.
    const TYPE_NAME: &'static str;

    fn variant_name(&self) -> &'static str;
    fn from_variant_name(name: &str) -> Option<Self>;
}

/// `"NodeKind"` -> `"node_kind"`.
pub fn derived_property_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len() + 4);
    for (i, ch) in type_name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Stores/reads a [`PropertyEnum`]'s variant name as a string value under
/// a property name derived from the enum's type name.
pub struct EnumBinding<E, T> {
    entity: E,
    name: String,
    default: T,
}

impl<E: Entity, T: PropertyEnum> EnumBinding<E, T> {
    pub fn new(entity: E, default: T) -> Self {
        let name = derived_property_name(T::TYPE_NAME);
        Self {
            entity,
            name,
            default,
        }
    }

    pub fn get(&self) -> Result<T> {
        match self.entity.get_prop(&self.name)?.and_then(|v| v.as_str().map(str::to_string)) {
            Some(name) => Ok(T::from_variant_name(&name).unwrap_or(self.default)),
            None => Ok(self.default),
        }
    }

    pub fn set(&self, value: T) -> Result<()> {
        self.entity
            .set_prop(&self.name, Some(Value::string(value.variant_name())))
    }
}
