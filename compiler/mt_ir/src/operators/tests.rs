use super::*;

#[test]
fn test_comparison_classification() {
    assert!(BinaryOp::Lt.is_comparison());
    assert!(BinaryOp::NotEq.is_comparison());
    assert!(!BinaryOp::RefEq.is_comparison());
    assert!(!BinaryOp::And.is_comparison());
}

#[test]
fn test_yields_bool() {
    for op in [
        BinaryOp::Eq,
        BinaryOp::And,
        BinaryOp::Contains,
        BinaryOp::InstanceOf,
        BinaryOp::RefNotEq,
    ] {
        assert!(op.yields_bool(), "{op:?}");
    }
    assert!(!BinaryOp::Add.yields_bool());
    assert!(!BinaryOp::BitAnd.yields_bool());
}

#[test]
fn test_augmented_assignment_maps_to_binary() {
    assert_eq!(AssignOp::Assign.binary(), None);
    assert_eq!(AssignOp::Add.binary(), Some(BinaryOp::Add));
    assert_eq!(AssignOp::Shr.binary(), Some(BinaryOp::Shr));
    assert_eq!(AssignOp::Pow.as_symbol(), "**=");
}

#[test]
fn test_unary_shape() {
    assert!(UnaryOp::PostInc.is_postfix());
    assert!(!UnaryOp::PreInc.is_postfix());
    assert!(UnaryOp::PreDec.is_step());
    assert!(UnaryOp::Deref.is_pointer());
    assert_eq!(UnaryOp::PostDec.as_symbol(), "--");
}
