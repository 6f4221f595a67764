//! Identity table for recurring names.
//!
//! Method names and erased type names repeat across every level of every
//! hierarchy build; interning them turns signature keys into small `Copy`
//! handles that hash and compare cheaply.

use lasso::{Spur, ThreadedRodeo};
use std::sync::Arc;

/// Interned string handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub Spur);

/// Thread-safe interner shared by every build of one service.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    rodeo: Arc<ThreadedRodeo>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    pub fn intern(&self, name: &str) -> Symbol {
        Symbol(self.rodeo.get_or_intern(name))
    }

    /// Look up an already interned name without inserting it.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.rodeo.get(name).map(Symbol)
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.rodeo.resolve(&symbol.0)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let table = SymbolTable::new();
        let a = table.intern("java.lang.String");
        let b = table.intern("java.lang.String");
        assert_eq!(a, b);
        assert_eq!(table.resolve(a), "java.lang.String");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let table = SymbolTable::new();
        let clone = table.clone();
        let sym = clone.intern("m");
        assert_eq!(table.get("m"), Some(sym));
    }

    #[test]
    fn test_concurrent_interning() {
        let table = SymbolTable::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = table.clone();
                std::thread::spawn(move || table.intern("shared"))
            })
            .collect();
        let symbols: Vec<Symbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
