use serde_json::{Map, Value};

use crate::accumulator::PatchAccumulator;
use crate::error::{PatchError, PatchResult};

use super::ContainerPatchHelper;

/// `customProperties` map inside an entity's properties aspect.
#[derive(Debug, Clone, Copy)]
pub struct CustomPropertiesPatchHelper {
    properties: ContainerPatchHelper,
}

impl CustomPropertiesPatchHelper {
    pub const fn new(aspect: &'static str) -> Self {
        Self {
            properties: ContainerPatchHelper::new(aspect, "customProperties"),
        }
    }

    pub fn add_property(&self, acc: &mut PatchAccumulator, key: &str, value: &str) -> PatchResult<()> {
        self.properties
            .add_entry(acc, key, Value::String(value.to_string()))
    }

    pub fn remove_property(&self, acc: &mut PatchAccumulator, key: &str) -> PatchResult<()> {
        self.properties.remove_entry(acc, key)
    }

    /// Replaces the whole map; iteration order of `properties` is kept.
    pub fn set_properties<I, K, V>(&self, acc: &mut PatchAccumulator, properties: I) -> PatchResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Map::new();
        for (k, v) in properties {
            let k = k.into();
            if k.is_empty() {
                return Err(PatchError::invalid_argument("custom property key is empty"));
            }
            map.insert(k, Value::String(v.into()));
        }
        self.properties.set_all(acc, Value::Object(map))
    }
}
