//! Class system: `ClassDef`, `Method`, and `ClassInstance`. The parent
//! link is an owning `Rc` rather than a raw pointer or a `Weak` — classes
//! outlive every instance of them and there's no cycle through `parent`
//! (it only ever points up the inheritance chain), so there's nothing for
//! `Weak` to buy here.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::SStmt;
use crate::closure::Closure;
use crate::value::Value;

pub struct Method {
  pub name: Rc<str>,
  pub params: Vec<Rc<str>>,
  pub body: Rc<SStmt>,
}

impl fmt::Debug for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Method")
      .field("name", &self.name)
      .field("params", &self.params)
      .finish()
  }
}

pub struct ClassDef {
  pub name: Rc<str>,
  pub parent: Option<Rc<ClassDef>>,
  pub methods: IndexMap<Rc<str>, Rc<Method>>,
}

impl ClassDef {
  pub fn new(
    name: impl Into<Rc<str>>,
    parent: Option<Rc<ClassDef>>,
    methods: IndexMap<Rc<str>, Rc<Method>>,
  ) -> Self {
    ClassDef {
      name: name.into(),
      parent,
      methods,
    }
  }

  /// Walk this class then its parent chain, returning the first match.
  pub fn get_method(&self, name: &str) -> Option<Rc<Method>> {
    if let Some(m) = self.methods.get(name) {
      return Some(m.clone());
    }
    self.parent.as_ref().and_then(|p| p.get_method(name))
  }

  pub fn has_method(&self, name: &str, argc: usize) -> bool {
    self
      .get_method(name)
      .is_some_and(|m| m.params.len() == argc)
  }
}

impl fmt::Debug for ClassDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ClassDef").field("name", &self.name).finish()
  }
}

struct InstanceData {
  class: Rc<ClassDef>,
  fields: Closure,
  id: u64,
}

thread_local! {
  static NEXT_INSTANCE_ID: Cell<u64> = const { Cell::new(0) };
}

fn next_instance_id() -> u64 {
  NEXT_INSTANCE_ID.with(|cell| {
    let id = cell.get();
    cell.set(id + 1);
    id
  })
}

/// A live object: a class reference plus its own fields `Closure`.
/// Reference-counted and interior-mutable so that multiple `Value::ClassInstance`
/// clones (e.g. `self` captured across calls, or a field storing the instance
/// itself) share one mutable identity — this is what tolerates cyclic object
/// graphs without a tracing collector.
#[derive(Clone)]
pub struct Instance(Rc<RefCell<InstanceData>>);

impl Instance {
  pub fn new(class: Rc<ClassDef>) -> Self {
    Instance(Rc::new(RefCell::new(InstanceData {
      class,
      fields: Closure::new(),
      id: next_instance_id(),
    })))
  }

  pub fn class(&self) -> Rc<ClassDef> {
    self.0.borrow().class.clone()
  }

  pub fn id(&self) -> u64 {
    self.0.borrow().id
  }

  pub fn get_field(&self, name: &str) -> Option<Value> {
    self.0.borrow().fields.get(name).cloned()
  }

  pub fn set_field(&self, name: impl Into<Rc<str>>, value: Value) {
    self.0.borrow_mut().fields.set(name, value);
  }

  pub fn get_method(&self, name: &str) -> Option<Rc<Method>> {
    self.0.borrow().class.get_method(name)
  }

  pub fn has_method(&self, name: &str, argc: usize) -> bool {
    self.0.borrow().class.has_method(name, argc)
  }
}

impl PartialEq for Instance {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ClassInstance@{}", self.id())
  }
}
