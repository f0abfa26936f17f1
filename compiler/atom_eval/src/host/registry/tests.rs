use super::*;
use crate::EvalError;
use atom_ir::CallbackError;
use pretty_assertions::assert_eq;

struct NoCallbacks;

impl CallbackContext for NoCallbacks {
    fn call(&mut self, _: &Callback, _: Vec<Value>) -> Result<Option<Value>, EvalError> {
        Err(EvalError::Callback(CallbackError::Detached))
    }
}

fn counter_type() -> HostType {
    HostType::new("demo", "Demo.Counters", "Counter")
}

fn demo_registry() -> HostRegistry {
    let counter = TypeDescriptor::new(counter_type())
        .constructor(Some(0), |_| Ok(Some(Value::Integer(0))))
        .method("Add", Receiver::Static, Some(2), |inv| {
            Ok(Some(Value::Integer(inv.integer(0)? + inv.integer(1)?)))
        })
        .method("Add", Receiver::Static, Some(3), |inv| {
            Ok(Some(Value::Integer(
                inv.integer(0)? + inv.integer(1)? + inv.integer(2)?,
            )))
        })
        .void_method("Reset", Receiver::Instance, Some(0), |_| Ok(None))
        .property("Limit", Receiver::Static, |_| Ok(Some(Value::Integer(10))))
        .setter("Limit", |inv| Ok(Some(inv.arg(0)?.clone())))
        .event("Changed", |_| Ok(None));
    let hidden = TypeDescriptor::new(HostType::new("demo", "Demo.Hidden", "Secret"));
    HostRegistry::new().with_module(
        ModuleDescriptor::new("demo")
            .with_type(counter)
            .with_type(hidden),
    )
}

fn call(member: &str, flags: MemberFlags, target: Option<Value>, args: Vec<Value>) -> HostCall {
    HostCall {
        ty: counter_type(),
        member: member.to_string(),
        flags,
        target,
        args,
    }
}

#[test]
fn types_filters_by_namespace() {
    let registry = demo_registry();
    let exports = registry.types("demo", &["Demo.Counters".to_string()]);
    let exports = exports.unwrap_or_default();
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].ty, counter_type());
    assert_eq!(exports[0].members, vec!["Add", "Reset", "Limit"]);
}

#[test]
fn unknown_module_is_an_error() {
    let registry = demo_registry();
    assert_eq!(
        registry.types("missing", &[]),
        Err(HostError::UnknownModule("missing".to_string()))
    );
}

#[test]
fn find_type_accepts_short_and_full_names() {
    let registry = demo_registry();
    assert_eq!(registry.find_type("demo", "Counter"), Ok(counter_type()));
    assert_eq!(
        registry.find_type("demo", "Demo.Counters.Counter"),
        Ok(counter_type())
    );
    assert!(matches!(
        registry.find_type("demo", "Nope"),
        Err(HostError::UnknownType { .. })
    ));
}

#[test]
fn resolve_member_kinds() {
    let registry = demo_registry();
    let ty = counter_type();
    assert_eq!(registry.resolve_member(&ty, "new", 0), MemberKind::Constructor);
    assert_eq!(
        registry.resolve_member(&ty, "Add", 2),
        MemberKind::Method { returns: true }
    );
    assert_eq!(
        registry.resolve_member(&ty, "Reset", 0),
        MemberKind::Method { returns: false }
    );
    assert_eq!(registry.resolve_member(&ty, "Limit", 0), MemberKind::Property);
    assert_eq!(registry.resolve_member(&ty, "Changed", 1), MemberKind::Event);
    assert_eq!(registry.resolve_member(&ty, "Other", 0), MemberKind::Missing);
}

#[test]
fn overloads_are_selected_by_arity() {
    let registry = demo_registry();
    let flags = MemberFlags::STATIC | MemberFlags::PUBLIC | MemberFlags::INVOKE_METHOD;
    let two = call("Add", flags, None, vec![Value::Integer(1), Value::Integer(2)]);
    assert_eq!(registry.invoke(&two, &mut NoCallbacks), Ok(Some(Value::Integer(3))));
    let three = call(
        "Add",
        flags,
        None,
        vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)],
    );
    assert_eq!(registry.invoke(&three, &mut NoCallbacks), Ok(Some(Value::Integer(6))));
    let one = call("Add", flags, None, vec![Value::Integer(1)]);
    assert_eq!(
        registry.invoke(&one, &mut NoCallbacks),
        Err(HostError::NoOverload {
            ty: "Counter".to_string(),
            member: "Add".to_string(),
            argc: 1,
        })
    );
}

#[test]
fn instance_members_need_a_target() {
    let registry = demo_registry();
    let flags = MemberFlags::INSTANCE | MemberFlags::PUBLIC | MemberFlags::INVOKE_METHOD;
    assert_eq!(
        registry.invoke(&call("Reset", flags, None, vec![]), &mut NoCallbacks),
        Err(HostError::MissingTarget {
            member: "Reset".to_string()
        })
    );
    assert_eq!(
        registry.invoke(
            &call("Reset", flags, Some(Value::Integer(0)), vec![]),
            &mut NoCallbacks
        ),
        Ok(None)
    );
}

#[test]
fn property_get_and_set() {
    let registry = demo_registry();
    let get = call(
        "Limit",
        MemberFlags::STATIC | MemberFlags::GET_PROPERTY,
        None,
        vec![],
    );
    assert_eq!(registry.invoke(&get, &mut NoCallbacks), Ok(Some(Value::Integer(10))));
    let set = call(
        "Limit",
        MemberFlags::STATIC | MemberFlags::SET_PROPERTY,
        None,
        vec![Value::Integer(4)],
    );
    assert_eq!(registry.invoke(&set, &mut NoCallbacks), Ok(Some(Value::Integer(4))));
}

#[test]
fn event_adder_is_a_special_method() {
    let registry = demo_registry();
    let add = call(
        "add_Changed",
        MemberFlags::INSTANCE | MemberFlags::INVOKE_METHOD,
        Some(Value::Integer(0)),
        vec![Value::Integer(1)],
    );
    assert_eq!(registry.invoke(&add, &mut NoCallbacks), Ok(None));
}

#[test]
fn constructor_via_create_instance() {
    let registry = demo_registry();
    let create = call("new", MemberFlags::CREATE_INSTANCE, None, vec![]);
    assert_eq!(registry.invoke(&create, &mut NoCallbacks), Ok(Some(Value::Integer(0))));
}

#[test]
fn convert_accepts_identity_and_object() {
    let registry = demo_registry();
    let value = Value::Integer(3);
    assert_eq!(registry.convert(&value, &builtin_type("Int64")), Ok(value.clone()));
    assert_eq!(registry.convert(&value, &builtin_type("Object")), Ok(value.clone()));
    assert!(matches!(
        registry.convert(&value, &counter_type()),
        Err(HostError::Conversion { .. })
    ));
}

#[test]
fn type_of_builtin_values() {
    let registry = demo_registry();
    assert_eq!(registry.type_of(&Value::string("x")), builtin_type("String"));
    assert_eq!(registry.type_of(&Value::Boolean(true)).name(), "Boolean");
}

#[test]
fn invocation_argument_helpers() {
    let args = [Value::Integer(2), Value::string("s"), Value::symbol("y")];
    let mut ctx = NoCallbacks;
    let inv = Invocation {
        target: None,
        args: &args,
        ctx: &mut ctx,
    };
    assert_eq!(inv.integer(0), Ok(2));
    assert_eq!(inv.float(0), Ok(2.0));
    assert_eq!(inv.text(1), Ok("s".to_string()));
    assert_eq!(inv.text(2), Ok("y".to_string()));
    assert!(matches!(inv.integer(1), Err(HostError::Argument { index: 1, .. })));
    assert!(inv.arg(3).is_err());
    assert!(matches!(inv.this(), Err(HostError::MissingTarget { .. })));
}
