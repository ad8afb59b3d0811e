//! The insertion-ordered body registry.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use apsis_core::BodyId;

use crate::body::Body;

/// Errors from environment construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentError {
    /// A body with this name is already registered.
    DuplicateBody {
        /// The conflicting name.
        name: String,
    },
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateBody { name } => {
                write!(f, "body '{name}' is already registered")
            }
        }
    }
}

impl Error for EnvironmentError {}

/// The set of bodies participating in a simulation.
///
/// Bodies are registered once, before propagation, and assigned dense
/// sequential [`BodyId`]s in insertion order. Iteration order equals
/// registration order, which is what makes model-entry flattening and
/// therefore floating-point summation deterministic across runs.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    bodies: IndexMap<String, Body>,
}

impl Environment {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a body, assigning the next sequential id.
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, EnvironmentError> {
        if self.bodies.contains_key(&body.name) {
            return Err(EnvironmentError::DuplicateBody {
                name: body.name.clone(),
            });
        }
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.insert(body.name.clone(), body);
        Ok(id)
    }

    /// Number of registered bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no bodies are registered.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The body with this id.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get_index(id.index()).map(|(_, b)| b)
    }

    /// Mutable access to the body with this id.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_index_mut(id.index()).map(|(_, b)| b)
    }

    /// The id registered under `name`.
    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.bodies.get_index_of(name).map(|i| BodyId(i as u32))
    }

    /// The body registered under `name`.
    pub fn body_by_name(&self, name: &str) -> Option<&Body> {
        self.bodies.get(name)
    }

    /// The name of the body with this id, for diagnostics.
    pub fn name_of(&self, id: BodyId) -> Option<&str> {
        self.bodies.get_index(id.index()).map(|(n, _)| n.as_str())
    }

    /// Bodies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies
            .values()
            .enumerate()
            .map(|(i, b)| (BodyId(i as u32), b))
    }
}
