//! Property-based tests for authorization decisions.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{Action, Authorizer, Role};
    use proptest::prelude::*;

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn any_action() -> impl Strategy<Value = Action> {
        prop::sample::select(Action::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_has_role_is_rank_comparison(required in any_role(), actual in any_role()) {
            let authz = Authorizer::standard();
            prop_assert_eq!(
                authz.has_role(required, actual),
                actual.rank() >= required.rank()
            );
        }

        #[test]
        fn test_permission_is_upward_closed(
            lower in any_role(),
            higher in any_role(),
            action in any_action(),
        ) {
            prop_assume!(lower <= higher);
            let authz = Authorizer::standard();
            if authz.can_perform(lower, action) {
                prop_assert!(authz.can_perform(higher, action));
            }
        }

        #[test]
        fn test_assignable_roles_exclude_self_and_above(role in any_role()) {
            let authz = Authorizer::standard();
            let assignable = authz.assignable_roles(role);
            prop_assert!(assignable.iter().all(|r| *r < role));
            prop_assert!(assignable.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn test_unknown_action_names_denied(role in any_role(), name in "[a-z_]{1,24}") {
            prop_assume!(name.parse::<Action>().is_err());
            let authz = Authorizer::standard();
            prop_assert!(!authz.can_perform_action(role, &name));
        }

        #[test]
        fn test_named_and_typed_checks_agree(role in any_role(), action in any_action()) {
            let authz = Authorizer::standard();
            prop_assert_eq!(
                authz.check_action(role, action.as_str()).unwrap(),
                authz.can_perform(role, action)
            );
        }
    }
}
