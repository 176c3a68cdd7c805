use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::Rational;

/// A dense, nonnegative integer handle assigned on creation.
///
/// Ids are never reused: [`VariableTable::add`] always returns a fresh
/// id one past the last one handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The model: current assignment from [`VarId`] to [`Rational`].
///
/// Variables are created once via [`add`](Self::add) and never
/// destroyed; there is no removal API, mirroring the row store's own
/// append-only, dead-flag-instead-of-removal design.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    values: Vec<Rational>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: Rational) -> VarId {
        let id = VarId(self.values.len());
        self.values.push(value);
        id
    }

    pub fn get(&self, v: VarId) -> &Rational {
        &self.values[v.0]
    }

    pub fn set(&mut self, v: VarId, value: Rational) {
        self.values[v.0] = value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
