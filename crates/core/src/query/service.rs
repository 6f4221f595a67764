use hierscope_api::models::{MethodInfo, SearchScope, TypeInfo};
use hierscope_api::provider::ProgramModel;
use rayon::prelude::*;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheStats, SignatureCache};
use crate::config::EngineConfig;
use crate::error::{HierarchyError, Result};
use crate::hierarchy::{
    HierarchicalSignature, HierarchyBuilder, HierarchyMap, MethodSignature, Substitutor,
    SupertypeWalker,
};
use crate::intern::SymbolTable;

/// Point queries over method hierarchies of one program model.
pub struct HierarchyService {
    model: Arc<dyn ProgramModel>,
    symbols: SymbolTable,
    cache: SignatureCache,
    config: EngineConfig,
}

impl HierarchyService {
    pub fn new(model: Arc<dyn ProgramModel>) -> Self {
        Self::with_config(model, EngineConfig::default())
    }

    pub fn with_config(model: Arc<dyn ProgramModel>, config: EngineConfig) -> Self {
        Self {
            model,
            symbols: SymbolTable::new(),
            cache: SignatureCache::new(),
            config,
        }
    }

    pub fn model(&self) -> &Arc<dyn ProgramModel> {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn builder<'a>(
        &'a self,
        scope: &'a SearchScope,
        cancel: &'a CancellationToken,
    ) -> HierarchyBuilder<'a> {
        let walker =
            SupertypeWalker::new(self.model.as_ref(), scope, self.config.implicit_top_type);
        HierarchyBuilder::new(walker, &self.symbols, cancel)
    }

    fn resolve_type(&self, fqn: &str, scope: &SearchScope) -> Result<Arc<TypeInfo>> {
        self.model
            .get_type_info(fqn, scope)
            .ok_or_else(|| HierarchyError::TypeNotFound(fqn.to_string()))
    }

    /// Every signature visible on `fqn` in the default scope.
    pub fn visible_signatures(
        &self,
        fqn: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<HierarchyMap>> {
        self.visible_signatures_in(fqn, &self.config.default_scope, cancel)
    }

    /// Every signature visible on `fqn` when only `scope` is searched.
    ///
    /// Private methods are excluded; results are cached per type and scope.
    pub fn visible_signatures_in(
        &self,
        fqn: &str,
        scope: &SearchScope,
        cancel: &CancellationToken,
    ) -> Result<Arc<HierarchyMap>> {
        let ty = self.resolve_type(fqn, scope)?;
        let compute = || {
            tracing::debug!("building visible signatures of {}", fqn);
            self.builder(scope, cancel)
                .build_map(&ty, None, &Substitutor::empty(), false)
        };
        if !self.config.cache_enabled {
            return compute().map(Arc::new);
        }
        let stamp = self.model.modification_count();
        self.cache.full_map(fqn, scope, stamp, compute)
    }

    /// `method` together with the forest of signatures it overrides.
    ///
    /// A method whose containing type cannot be resolved yields an entry
    /// without supers.
    pub fn hierarchical_signature(
        &self,
        method: &Arc<MethodInfo>,
        cancel: &CancellationToken,
    ) -> Result<HierarchicalSignature> {
        let scope = &self.config.default_scope;
        let Some(ty) = self.model.get_type_info(&method.declaring_type, scope) else {
            tracing::trace!("{} has no resolvable containing type", method);
            return Ok(HierarchicalSignature::new(MethodSignature::declared(
                method.clone(),
            )));
        };

        let compute = || {
            tracing::debug!("building {} hierarchy of {}", method.name, ty.fqn);
            self.builder(scope, cancel)
                .build_map(&ty, Some(&method.name), &Substitutor::empty(), true)
        };
        // Copies that live outside the model would poison the shared entry.
        let map = if method.is_physical && self.config.cache_enabled {
            let stamp = self.model.modification_count();
            self.cache.name_map(&ty.fqn, &method.name, stamp, compute)?
        } else {
            Arc::new(compute()?)
        };

        if let Some(found) = map.find_method(&method.id) {
            return Ok(found.clone());
        }
        let declared = MethodSignature::declared(method.clone());
        if let Some(found) = map
            .get(&declared.key(&self.symbols))
            .and_then(|bucket| bucket.first())
        {
            return Ok(found.clone());
        }
        Ok(HierarchicalSignature::new(declared))
    }

    /// Whether `candidate` is among the (transitive) supers of `method`.
    pub fn is_super_method_smart(
        &self,
        method: &Arc<MethodInfo>,
        candidate: &Arc<MethodInfo>,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        if method.id == candidate.id
            || method.is_constructor()
            || candidate.is_constructor()
            || candidate.is_private()
            || candidate.is_static()
            || method.is_private()
            || method.is_static()
        {
            return Ok(false);
        }
        if self
            .model
            .get_type_info(&method.declaring_type, &self.config.default_scope)
            .is_none()
        {
            return Ok(false);
        }
        let signature = self.hierarchical_signature(method, cancel)?;
        Ok(signature.has_super(&candidate.id))
    }

    /// Visit the direct super methods of `method` until the visitor breaks.
    ///
    /// Returns `true` when every super was visited.
    pub fn process_direct_super_methods<F>(
        &self,
        method: &Arc<MethodInfo>,
        cancel: &CancellationToken,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&Arc<MethodInfo>) -> ControlFlow<()>,
    {
        let signature = self.hierarchical_signature(method, cancel)?;
        for sup in &signature.supers {
            if visitor(sup.method()).is_break() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Every method `method` overrides, directly or transitively, each once.
    pub fn super_methods(
        &self,
        method: &Arc<MethodInfo>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Arc<MethodInfo>>> {
        Ok(self
            .hierarchical_signature(method, cancel)?
            .all_super_methods())
    }

    /// Uncached map of `fqn` seen through `substitutor`.
    pub fn build_full_map(
        &self,
        fqn: &str,
        name_filter: Option<&str>,
        substitutor: &Substitutor,
        include_privates: bool,
        scope: &SearchScope,
        cancel: &CancellationToken,
    ) -> Result<HierarchyMap> {
        let ty = self.resolve_type(fqn, scope)?;
        self.builder(scope, cancel)
            .build_map(&ty, name_filter, substitutor, include_privates)
    }

    /// Warm the cache for many types at once on the rayon pool.
    pub fn prefetch<S>(
        &self,
        fqns: &[S],
        cancel: &CancellationToken,
    ) -> Vec<(String, Result<Arc<HierarchyMap>>)>
    where
        S: AsRef<str> + Sync,
    {
        fqns.par_iter()
            .map(|fqn| {
                let fqn = fqn.as_ref();
                (fqn.to_string(), self.visible_signatures(fqn, cancel))
            })
            .collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
