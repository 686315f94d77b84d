//! Materials
//!
//! Material data (cross sections) is owned by an external provider. The geometry only
//! needs an opaque, shareable handle to put in the cells it fills.

use crate::types::ConstructionError;
use std::collections::HashMap;
use std::sync::Arc;

/// An opaque material handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Material {
    name: String,
}

impl Material {
    /// Create a material
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { name: name.into() })
    }

    /// The name of the material
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A collection of materials keyed by name
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material, replacing any material with the same name
    pub fn insert(&mut self, material: Arc<Material>) {
        self.materials.insert(material.name().to_string(), material);
    }

    /// Get a material by name
    pub fn get(&self, name: &str) -> Result<Arc<Material>, ConstructionError> {
        self.materials
            .get(name)
            .cloned()
            .ok_or_else(|| ConstructionError::UnknownMaterial(name.to_string()))
    }

    /// The number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Is the library empty?
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl FromIterator<Arc<Material>> for MaterialLibrary {
    fn from_iter<I: IntoIterator<Item = Arc<Material>>>(iter: I) -> Self {
        let mut library = Self::new();
        for material in iter {
            library.insert(material);
        }
        library
    }
}
