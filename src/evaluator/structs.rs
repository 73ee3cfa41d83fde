use super::Evaluator;
use crate::ast::{self, DeclarationKind};
use crate::environment::Environment;
use crate::object::{EvalError, FunctionObject, Instance, Object, OrderedMap, Result, StructType};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::debug;

impl Evaluator {
    /// Class fields are evaluated once, here. Instance fields are kept as
    /// initializers and evaluated for every `new`.
    pub(super) fn eval_struct_declaration(
        &mut self,
        declaration: &ast::StructDeclaration,
        env: &Environment,
    ) -> Result<Object> {
        let name = &declaration.name.value;
        Self::check_redeclaration(name, env)?;

        let mut class_fields = OrderedMap::new();
        let mut constants = HashSet::new();
        let mut instance_fields = vec![];
        for field in &declaration.fields {
            if field.kind == DeclarationKind::Var {
                instance_fields.push(field.clone());
                continue;
            }
            let value = match &field.value {
                Some(value) => self.eval(value, env)?,
                None => Object::Nil,
            };
            if field.kind == DeclarationKind::Const {
                constants.insert(field.name.value.clone());
            }
            class_fields.insert(field.name.value.clone(), value);
        }

        let methods = declaration
            .methods
            .iter()
            .filter_map(|method| {
                let function = Rc::new(FunctionObject::new(method, env.clone()));
                method.name.clone().map(|name| (name, function))
            })
            .collect();

        let struct_type = StructType {
            name: name.clone(),
            methods,
            class_fields: RefCell::new(class_fields),
            constants,
            instance_fields,
            env: env.clone(),
        };
        debug!(name = name.as_str(), ?struct_type, "declared struct");
        env.bind(name, Object::Struct(Rc::new(struct_type)));
        Ok(Object::Nil)
    }

    pub(super) fn eval_new(&mut self, new: &ast::NewExpression, env: &Environment) -> Result<Object> {
        let name = &new.name.value;
        let struct_type = match env.lookup(name) {
            Some(Object::Struct(struct_type)) => struct_type,
            _ => return Err(EvalError::UnknownStruct { name: name.clone() }),
        };
        let args = self.eval_arguments(&new.arguments, env);

        let instance = Rc::new(Instance::new(Rc::clone(&struct_type)));
        let defaults = Environment::with_enclosed(&struct_type.env);
        for field in &struct_type.instance_fields {
            let value = match &field.value {
                Some(value) => self.eval(value, &defaults)?,
                None => Object::Nil,
            };
            instance
                .fields
                .borrow_mut()
                .insert(field.name.value.clone(), value);
        }

        let receiver = Object::Instance(instance);
        match struct_type.method("init") {
            Some(init) => {
                self.call_user_function(&init, args, Some(receiver.clone()))
                    .into_result()?;
            }
            None if !args.is_empty() => {
                return Err(EvalError::IncorrectArity {
                    got: args.len(),
                    want: 0,
                })
            }
            None => {}
        }

        debug!(name = name.as_str(), "new instance");
        Ok(receiver)
    }
}

fn unknown_member(struct_type: &StructType, name: &str) -> EvalError {
    EvalError::UnknownMember {
        type_name: struct_type.name.clone(),
        name: name.to_owned(),
    }
}

pub(super) fn member_value(object: &Object, name: &str) -> Result<Object> {
    match object {
        Object::Instance(instance) => instance
            .get(name)
            .ok_or_else(|| unknown_member(&instance.struct_type, name)),
        Object::Struct(struct_type) => struct_type
            .member(name)
            .ok_or_else(|| unknown_member(struct_type, name)),
        Object::Map(map) => Ok(map.borrow().get(name).cloned().unwrap_or_default()),
        other => Err(EvalError::NoMembers {
            type_name: other.type_name(),
        }),
    }
}

pub(super) fn assign_member(object: &Object, name: &str, value: Object) -> Result<()> {
    match object {
        Object::Instance(instance) => instance.set(name, value),
        Object::Struct(struct_type) => struct_type.set_class_field(name, value),
        Object::Map(map) => {
            map.borrow_mut().insert(name.to_owned(), value);
            Ok(())
        }
        other => Err(EvalError::NoMembers {
            type_name: other.type_name(),
        }),
    }
}
