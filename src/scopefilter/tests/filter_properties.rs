//! Property-based tests for the filter pipeline

use proptest::prelude::*;
use scopefilter::{
    filter, resolve_action, Authorization, FilterError, PermissionSet, ScopeAttribute, SqlFilter,
};

const PREFIX: &str = "datasources";
const COLUMN: &str = "data_source.id";

fn run(permissions: &PermissionSet, actions: &[String]) -> SqlFilter {
    filter(permissions, COLUMN, PREFIX, ScopeAttribute::Id, actions).unwrap()
}

/// Scope strings: mostly valid ids, some wildcards, some garbage
fn scope_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => (1i64..20).prop_map(|id| format!("datasources:id:{}", id)),
        1 => Just("datasources:*".to_string()),
        1 => Just("datasources:id:*".to_string()),
        1 => (1i64..20).prop_map(|id| format!("dashboards:id:{}", id)),
        1 => "[a-z:*0-9]{0,12}",
    ]
}

fn exact_scope_strategy() -> impl Strategy<Value = String> {
    (1i64..20).prop_map(|id| format!("datasources:id:{}", id))
}

fn permissions_strategy() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(
        (
            "(read|write|delete|query)",
            prop::collection::vec(scope_strategy(), 0..8),
        ),
        0..4,
    )
}

fn to_set(entries: &[(String, Vec<String>)]) -> PermissionSet {
    entries
        .iter()
        .map(|(action, scopes)| (action.clone(), scopes.clone()))
        .collect()
}

proptest! {
    #[test]
    fn test_prefix_wildcard_always_unrestricted(
        before in prop::collection::vec(scope_strategy(), 0..6),
        after in prop::collection::vec(scope_strategy(), 0..6),
    ) {
        let mut scopes = before;
        scopes.push("datasources:*".to_string());
        scopes.extend(after);

        let permissions: PermissionSet = vec![("read", scopes)].into_iter().collect();
        let result = resolve_action(&permissions, "read", PREFIX, ScopeAttribute::Id);
        prop_assert_eq!(result, Authorization::Unrestricted);
    }

    #[test]
    fn test_missing_action_denies(entries in permissions_strategy()) {
        let permissions = to_set(&entries);
        let mut actions: Vec<String> = entries.iter().map(|(a, _)| a.clone()).collect();
        actions.push("never-granted".to_string());

        prop_assert!(run(&permissions, &actions).is_deny_all());
    }

    #[test]
    fn test_action_order_does_not_matter(
        entries in permissions_strategy(),
        seed in any::<u64>(),
    ) {
        let permissions = to_set(&entries);
        let actions: Vec<String> = vec!["read", "write", "delete", "query"]
            .into_iter()
            .map(String::from)
            .filter(|a| entries.iter().any(|(b, _)| b == a))
            .collect();
        prop_assume!(!actions.is_empty());

        let mut shuffled = actions.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        shuffled.reverse();

        prop_assert_eq!(run(&permissions, &actions), run(&permissions, &shuffled));
    }

    #[test]
    fn test_duplicates_do_not_change_output(
        scopes in prop::collection::vec(scope_strategy(), 1..10),
    ) {
        let once: PermissionSet = vec![("read", scopes.clone())].into_iter().collect();
        let doubled: Vec<String> = scopes.iter().chain(scopes.iter()).cloned().collect();
        let twice: PermissionSet = vec![("read", doubled)].into_iter().collect();

        let actions = vec!["read".to_string()];
        prop_assert_eq!(run(&once, &actions), run(&twice, &actions));
    }

    #[test]
    fn test_malformed_scopes_do_not_affect_valid_ones(
        valid in prop::collection::vec(exact_scope_strategy(), 1..8),
        junk in prop::collection::vec("[a-z0-9]{0,6}(:[a-z0-9*]{0,4}){0,4}", 0..8),
    ) {
        let junk: Vec<String> = junk
            .into_iter()
            .filter(|s| scopefilter::Scope::parse(s).is_err())
            .collect();

        let clean: PermissionSet = vec![("read", valid.clone())].into_iter().collect();
        let mixed_scopes: Vec<String> = junk.iter().chain(valid.iter()).cloned().collect();
        let mixed: PermissionSet = vec![("read", mixed_scopes)].into_iter().collect();

        let actions = vec!["read".to_string()];
        prop_assert_eq!(run(&clean, &actions), run(&mixed, &actions));
    }

    #[test]
    fn test_unknown_column_always_rejected(
        entries in permissions_strategy(),
        column in "[a-z_]{1,10}\\.[a-z_]{1,10}",
    ) {
        prop_assume!(column != "data_source.id");
        let permissions = to_set(&entries);

        let result = filter(&permissions, &column, PREFIX, ScopeAttribute::Id, &["read"]);
        let is_invalid_column = matches!(result, Err(FilterError::InvalidColumn { .. }));
        let is_accepted = scopefilter::AcceptList::builtin().contains(ScopeAttribute::Id, &column);
        prop_assert!(is_invalid_column || is_accepted);
    }

    #[test]
    fn test_args_match_placeholders(entries in permissions_strategy()) {
        let permissions = to_set(&entries);
        let actions: Vec<String> = entries.iter().map(|(a, _)| a.clone()).take(2).collect();
        prop_assume!(!actions.is_empty());

        let sql = run(&permissions, &actions);
        prop_assert_eq!(sql.where_clause.matches('?').count(), sql.args.len());

        let mut sorted = sql.args.clone();
        sorted.sort();
        prop_assert_eq!(sorted, sql.args);
    }
}
