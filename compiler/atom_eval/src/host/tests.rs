use super::*;

#[test]
fn call_signature_lists_arguments() {
    let call = HostCall {
        ty: HostType::new("core", "System", "Math"),
        member: "Max".to_string(),
        flags: MemberFlags::STATIC | MemberFlags::PUBLIC | MemberFlags::INVOKE_METHOD,
        target: None,
        args: vec![Value::Integer(3), Value::string("x")],
    };
    assert_eq!(call.signature(), "Math.Max(3, x)");
}

#[test]
fn flags_for_property_access() {
    assert_eq!(
        MemberFlags::for_access(MemberKind::Property, Receiver::Instance, 0),
        MemberFlags::PUBLIC | MemberFlags::INSTANCE | MemberFlags::GET_PROPERTY
    );
    assert_eq!(
        MemberFlags::for_access(MemberKind::Field, Receiver::Static, 1),
        MemberFlags::PUBLIC | MemberFlags::STATIC | MemberFlags::SET_FIELD
    );
}

#[test]
fn flag_bits_match_binding_flags() {
    assert_eq!(MemberFlags::from_bits(4 | 16 | 256), Some(
        MemberFlags::INSTANCE | MemberFlags::PUBLIC | MemberFlags::INVOKE_METHOD
    ));
    assert_eq!(MemberFlags::CREATE_INSTANCE.bits(), 512);
}
