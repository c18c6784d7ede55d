use model::{
    core::value::Value,
    expr::{ParamId, Parameter},
};
use std::collections::HashMap;

/// Parameter bindings visible while evaluating a tree. Lambda bodies evaluate
/// in a child scope that falls back to its parent.
#[derive(Debug, Default)]
pub struct EvalContext<'a> {
    bindings: HashMap<ParamId, Value>,
    parent: Option<&'a EvalContext<'a>>,
}

impl<'a> EvalContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, param: &Parameter, value: Value) -> Self {
        self.bind(param, value);
        self
    }

    pub fn bind(&mut self, param: &Parameter, value: Value) {
        self.bindings.insert(param.id, value);
    }

    pub fn child(&'a self) -> EvalContext<'a> {
        EvalContext {
            bindings: HashMap::new(),
            parent: Some(self),
        }
    }

    pub fn lookup(&self, id: &ParamId) -> Option<&Value> {
        self.bindings
            .get(id)
            .or_else(|| self.parent.and_then(|p| p.lookup(id)))
    }
}
