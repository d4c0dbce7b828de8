use crate::{
    error::{TuneError, TuneResult},
    ops::{ColorOp, Operation, TransparencyOp},
};

/// The ordered set of available operations.
///
/// Iteration order is registration order, and the pipeline applies
/// operations in iteration order, so registration order is an observable
/// contract. Keys must be unique.
#[derive(Default)]
pub struct OperationRegistry {
    ops: Vec<Box<dyn Operation>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in chain: transparency first, then color.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Keys are statically distinct, so registration cannot fail.
        registry.ops.push(Box::new(TransparencyOp));
        registry.ops.push(Box::new(ColorOp));
        registry
    }

    pub fn register(&mut self, op: Box<dyn Operation>) -> TuneResult<()> {
        if self.get(op.key()).is_some() {
            return Err(TuneError::registry(format!(
                "operation '{}' is already registered",
                op.key()
            )));
        }
        self.ops.push(op);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&dyn Operation> {
        self.ops
            .iter()
            .find(|op| op.key() == key)
            .map(Box::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Operation> {
        self.ops.iter().map(Box::as_ref)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ops.iter().map(|op| op.key())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_in_application_order() {
        let registry = OperationRegistry::with_builtins();
        assert_eq!(
            registry.keys().collect::<Vec<_>>(),
            ["transparency", "color"]
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut registry = OperationRegistry::new();
        registry.register(Box::new(ColorOp)).unwrap();
        let err = registry.register(Box::new(ColorOp)).unwrap_err();
        assert!(matches!(err, TuneError::Registry(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_finds_by_key() {
        let registry = OperationRegistry::with_builtins();
        assert!(registry.get("color").is_some());
        assert!(registry.get("blur").is_none());
    }
}
