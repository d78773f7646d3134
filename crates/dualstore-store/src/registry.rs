//! Per-model adapter and serializer lookup

use std::collections::HashMap;
use std::sync::Arc;

use dualstore_core::contract::{Adapter, Serializer};
use dualstore_core::errors::{DualStoreError, Result};

use crate::serializer::JsonApiSerializer;

/// Resolves adapters and serializers by model name
///
/// Adapters fall back to the application adapter; serializers fall back to
/// [`JsonApiSerializer`].
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn Adapter>>,
    application_adapter: Option<Arc<dyn Adapter>>,
    serializers: HashMap<String, Arc<dyn Serializer>>,
    default_serializer: Arc<dyn Serializer>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self {
            adapters: HashMap::new(),
            application_adapter: None,
            serializers: HashMap::new(),
            default_serializer: Arc::new(JsonApiSerializer),
        }
    }
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_adapter(&mut self, model_name: impl Into<String>, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(model_name.into(), adapter);
    }

    pub fn set_application_adapter(&mut self, adapter: Arc<dyn Adapter>) {
        self.application_adapter = Some(adapter);
    }

    pub fn register_serializer(
        &mut self,
        model_name: impl Into<String>,
        serializer: Arc<dyn Serializer>,
    ) {
        self.serializers.insert(model_name.into(), serializer);
    }

    /// # Errors
    ///
    /// Returns `UnknownModel` when neither a model adapter nor an
    /// application adapter is registered.
    pub fn adapter_for(&self, model_name: &str) -> Result<Arc<dyn Adapter>> {
        self.adapters
            .get(model_name)
            .or(self.application_adapter.as_ref())
            .cloned()
            .ok_or_else(|| {
                DualStoreError::UnknownModel {
                    model_name: model_name.to_string(),
                    facility: "adapter".to_string(),
                }
                .into()
            })
    }

    pub fn serializer_for(&self, model_name: &str) -> Arc<dyn Serializer> {
        self.serializers
            .get(model_name)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_serializer))
    }
}
