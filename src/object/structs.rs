use super::{EvalError, FunctionObject, Object, OrderedMap, Result};
use crate::ast::FieldDeclaration;
use crate::environment::Environment;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// A declared struct: its methods, class-level fields and the
/// initializers run for each new instance.
pub struct StructType {
    pub name: String,
    pub methods: HashMap<String, Rc<FunctionObject>>,
    pub class_fields: RefCell<OrderedMap>,
    pub constants: HashSet<String>,
    pub instance_fields: Vec<FieldDeclaration>,
    pub env: Environment,
}

impl StructType {
    pub fn method(&self, name: &str) -> Option<Rc<FunctionObject>> {
        self.methods.get(name).cloned()
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    pub fn class_field(&self, name: &str) -> Option<Object> {
        self.class_fields.borrow().get(name).cloned()
    }

    /// Class field first, then method.
    pub fn member(&self, name: &str) -> Option<Object> {
        self.class_field(name)
            .or_else(|| self.method(name).map(Object::Function))
    }

    pub fn set_class_field(&self, name: &str, value: Object) -> Result<()> {
        if self.is_constant(name) {
            return Err(EvalError::ConstantAssignment {
                name: format!("{}.{}", self.name, name),
            });
        }
        let mut fields = self.class_fields.borrow_mut();
        if !fields.contains_key(name) {
            return Err(EvalError::UnknownMember {
                type_name: self.name.clone(),
                name: name.to_owned(),
            });
        }
        fields.insert(name.to_owned(), value);
        Ok(())
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug)]
pub struct Instance {
    pub struct_type: Rc<StructType>,
    pub fields: RefCell<OrderedMap>,
}

impl Instance {
    pub fn new(struct_type: Rc<StructType>) -> Self {
        Self {
            struct_type,
            fields: Default::default(),
        }
    }

    pub fn field(&self, name: &str) -> Option<Object> {
        self.fields.borrow().get(name).cloned()
    }

    /// Instance field, then class field, then method.
    pub fn get(&self, name: &str) -> Option<Object> {
        self.field(name).or_else(|| self.struct_type.member(name))
    }

    pub fn set(&self, name: &str, value: Object) -> Result<()> {
        if self.struct_type.is_constant(name) {
            return Err(EvalError::ConstantAssignment {
                name: format!("{}.{}", self.struct_type.name, name),
            });
        }
        if self.struct_type.class_fields.borrow().contains_key(name) {
            return Err(EvalError::ClassFieldThroughInstance {
                name: name.to_owned(),
            });
        }
        self.fields.borrow_mut().insert(name.to_owned(), value);
        Ok(())
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .borrow()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value.repr()))
            .collect();
        write!(f, "{}{{{}}}", self.struct_type.name, fields.join(", "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn point_type() -> Rc<StructType> {
        let class_fields: OrderedMap = vec![
            ("count".to_owned(), Object::Integer(0)),
            ("ORIGIN".to_owned(), Object::Integer(0)),
        ]
        .into_iter()
        .collect();
        Rc::new(StructType {
            name: "Point".to_owned(),
            methods: HashMap::new(),
            class_fields: RefCell::new(class_fields),
            constants: vec!["ORIGIN".to_owned()].into_iter().collect(),
            instance_fields: vec![],
            env: Environment::new(),
        })
    }

    #[test]
    fn test_instance_field_writes() {
        let instance = Instance::new(point_type());
        assert_eq!(instance.set("x", Object::Integer(3)), Ok(()));
        assert_eq!(instance.get("x"), Some(Object::Integer(3)));
        assert_eq!(instance.get("count"), Some(Object::Integer(0)));

        assert_eq!(
            instance.set("ORIGIN", Object::Integer(1)),
            Err(EvalError::ConstantAssignment {
                name: "Point.ORIGIN".to_owned()
            })
        );
        assert_eq!(
            instance.set("count", Object::Integer(1)),
            Err(EvalError::ClassFieldThroughInstance {
                name: "count".to_owned()
            })
        );
        assert_eq!(instance.to_string(), "Point{x: 3}");
    }

    #[test]
    fn test_class_field_writes() {
        let point = point_type();
        assert_eq!(point.set_class_field("count", Object::Integer(2)), Ok(()));
        assert_eq!(point.class_field("count"), Some(Object::Integer(2)));
        assert!(point.set_class_field("ORIGIN", Object::Integer(2)).is_err());
        assert_eq!(
            point.set_class_field("missing", Object::Nil),
            Err(EvalError::UnknownMember {
                type_name: "Point".to_owned(),
                name: "missing".to_owned()
            })
        );
    }
}
