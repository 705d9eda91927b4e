//! Property-based tests for scope frames.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mt_ir::Type;
use mt_types::TypeScope;
use proptest::prelude::*;

fn ty() -> impl Strategy<Value = Type> {
    prop::sample::select(vec![
        Type::Int,
        Type::Float,
        Type::Bool,
        Type::Str,
        Type::Char,
        Type::Unknown,
    ])
}

proptest! {
    #[test]
    fn shadowing_never_alters_parent(
        name in "[a-z]{1,4}",
        outer in ty(),
        inner in prop::collection::vec(ty(), 1..6),
    ) {
        let mut scope = TypeScope::new();
        scope.add_variable(name.as_str(), outer.clone());
        for ty in &inner {
            scope.enter();
            scope.change_variable_type(&name, ty.clone(), false).unwrap();
            prop_assert_eq!(scope.variable_type(&name), Some(ty));
        }
        for _ in &inner {
            scope.leave(true).unwrap();
        }
        prop_assert_eq!(scope.variable_type(&name), Some(&outer));
        prop_assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn balanced_enter_leave_returns_to_root(depth in 0usize..12) {
        let mut scope = TypeScope::new();
        for _ in 0..depth {
            scope.enter();
        }
        for _ in 0..depth {
            prop_assert!(scope.leave(true).is_ok());
        }
        prop_assert!(scope.leave(true).is_err());
    }
}
