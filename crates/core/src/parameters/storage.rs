//! Parameter store
//!
//! Named, typed values for the route parameters. Each entry keeps its value
//! and flags together; the registered kind of an entry never changes.
//! Writes that change a value mark the store dirty so the host knows to
//! rebuild the navigator configuration before the next tick.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (power of two for the index map)
pub const MAX_PARAMS: usize = 32;

/// Bounded parameter name
pub type ParamName = String<PARAM_NAME_LEN>;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Value is fixed at registration
        const READ_ONLY = 0b0000_0001;
    }
}

/// Kind of value a parameter holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
}

/// Parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
        }
    }

    /// Numeric value as `f32`
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            ParamValue::Float(v) => Some(v),
            ParamValue::Int(v) => Some(v as f32),
            ParamValue::Bool(v) => Some(if v { 1.0 } else { 0.0 }),
        }
    }

    /// Integer value, `None` for non-integral floats
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            ParamValue::Int(v) => Some(v),
            ParamValue::Bool(v) => Some(i32::from(v)),
            ParamValue::Float(v) if v.is_finite() && libm::truncf(v) == v => Some(v as i32),
            ParamValue::Float(_) => None,
        }
    }

    /// Flag value; any non-zero number is `true`
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParamValue::Bool(v) => Some(v),
            ParamValue::Int(v) => Some(v != 0),
            ParamValue::Float(v) => Some(v != 0.0),
        }
    }

    /// Convert `self` into a value of `kind`
    ///
    /// Integers widen into floats; every other kind change is refused.
    fn coerce(self, kind: ParamKind) -> Option<ParamValue> {
        match (kind, self) {
            (ParamKind::Float, ParamValue::Int(v)) => Some(ParamValue::Float(v as f32)),
            (kind, value) if value.kind() == kind => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ParamEntry {
    value: ParamValue,
    flags: ParamFlags,
}

/// Parameter store
#[derive(Debug, Default)]
pub struct ParameterStore {
    entries: FnvIndexMap<ParamName, ParamEntry, MAX_PARAMS>,
    dirty: bool,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter with its default value
    ///
    /// Registering an existing name keeps the current value.
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = key(name).ok_or(ParameterError::NameTooLong)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }
        self.entries
            .insert(
                key,
                ParamEntry {
                    value: default_value,
                    flags,
                },
            )
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(&key(name)?).map(|e| &e.value)
    }

    /// Kind the parameter was registered with
    pub fn kind(&self, name: &str) -> Option<ParamKind> {
        self.get(name).map(ParamValue::kind)
    }

    pub fn flags(&self, name: &str) -> Option<ParamFlags> {
        self.entries.get(&key(name)?).map(|e| e.flags)
    }

    /// Change a parameter value
    ///
    /// The value must match the registered kind, except that integers are
    /// accepted for float parameters. Only an actual change marks the store
    /// dirty.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = key(name).ok_or(ParameterError::UnknownParameter)?;
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(ParameterError::UnknownParameter)?;
        if entry.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        let value = value
            .coerce(entry.value.kind())
            .ok_or(ParameterError::TypeMismatch)?;

        if entry.value != value {
            entry.value = value;
            self.dirty = true;
        }
        Ok(())
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A value changed since the last `clear_dirty`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

fn key(name: &str) -> Option<ParamName> {
    let mut key = ParamName::new();
    key.push_str(name).ok()?;
    Some(key)
}
