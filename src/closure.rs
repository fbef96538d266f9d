//! `Closure`: an activation-local name→value mapping. One is allocated per
//! method call; the program has exactly one root closure.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

#[derive(Debug, Default, Clone)]
pub struct Closure {
  vars: IndexMap<Rc<str>, Value>,
}

impl Closure {
  pub fn new() -> Self {
    Closure::default()
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.vars.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.vars.contains_key(name)
  }

  pub fn set(&mut self, name: impl Into<Rc<str>>, value: Value) {
    self.vars.insert(name.into(), value);
  }
}
