use super::*;
use crate::params;
use crate::value::Value;

#[test]
fn test_select_basic() {
    let q = Query::table("users").select("*");
    assert_eq!(q.to_sql(), "SELECT * FROM users");
}

#[test]
fn test_select_clause_order() {
    let q = Query::table("users")
        .limit(10)
        .sort(["name", "age"])
        .filter("`id` > :id", params! { "id" => 1 })
        .select("id, name");

    assert_eq!(
        q.to_sql(),
        "SELECT id, name FROM users WHERE `id` > :id ORDER BY name,age LIMIT 10"
    );
}

#[test]
fn test_select_optional_clauses() {
    let base = Query::table("users").select("*");

    assert_eq!(
        base.clone().sort(["created DESC"]).to_sql(),
        "SELECT * FROM users ORDER BY created DESC"
    );
    assert_eq!(base.clone().limit(5).to_sql(), "SELECT * FROM users LIMIT 5");
    assert_eq!(base.clone().limit(0).to_sql(), "SELECT * FROM users");
    assert_eq!(
        base.filter("   ", Params::new()).to_sql(),
        "SELECT * FROM users"
    );
}

#[test]
fn test_limit_zero_clears() {
    let q = Query::table("t").select("*").limit(3).limit(0);
    assert_eq!(q.limit_value(), None);
}

#[test]
fn test_insert_basic() {
    let q = Query::table("users").values(params! { "name" => "Ann", "age" => 30 });
    assert_eq!(
        q.to_sql(),
        "INSERT INTO users (name,age) VALUES (:name,:age)"
    );
    assert_eq!(q.kind(), StatementKind::Insert);
}

#[test]
fn test_update_basic() {
    let q = Query::table("users")
        .filter("`id` = :id", params! { "id" => 5 })
        .set(params! { "name" => "Ann", "age" => 31 });
    assert_eq!(
        q.to_sql(),
        "UPDATE users SET name=:name, age=:age WHERE `id` = :id"
    );
}

#[test]
fn test_update_without_filter_renders_set_only() {
    let q = Query::table("users").set(params! { "active" => false });
    assert_eq!(q.to_sql(), "UPDATE users SET active=:active");
}

#[test]
fn test_empty_renders_nothing() {
    assert_eq!(Query::table("users").to_sql(), "");
    assert_eq!(Query::table("users").values(Params::new()).to_sql(), "");
    assert_eq!(Query::new().kind(), StatementKind::Empty);
}

#[test]
fn test_select_takes_precedence_in_render() {
    let q = Query::table("users")
        .values(params! { "name" => "Ann" })
        .select("*");
    assert_eq!(q.kind(), StatementKind::Select);
    assert_eq!(q.to_sql(), "SELECT * FROM users");
}

#[test]
fn test_for_fetch_defaults_to_star() {
    let q = Query::table("users").for_fetch();
    assert_eq!(q.to_sql(), "SELECT * FROM users");

    let q = Query::table("users").select("id").for_fetch();
    assert_eq!(q.to_sql(), "SELECT id FROM users");

    let q = Query::table("users")
        .values(params! { "name" => "Ann" })
        .for_fetch();
    assert_eq!(q.kind(), StatementKind::Select);
    assert_eq!(q.to_sql(), "SELECT * FROM users");
}

#[test]
fn test_for_mutation_drops_select() {
    let q = Query::table("users")
        .select("*")
        .for_mutation(Mutation::Insert(params! { "name" => "Ann" }));
    assert_eq!(q.to_sql(), "INSERT INTO users (name) VALUES (:name)");
}

#[test]
fn test_bind_params_merges_filter_over_fields() {
    let q = Query::table("users")
        .filter("`id` = :id", params! { "id" => 5 })
        .set(params! { "name" => "Ann", "id" => 99 });
    let p = q.bind_params();
    assert_eq!(p.get("id"), Some(&Value::Int(5)));
    assert_eq!(p.get("name"), Some(&Value::Text("Ann".into())));
}

#[test]
fn test_bind_params_for_select_is_filter() {
    let q = Query::table("users")
        .select("*")
        .filter("`id` = :id", params! { "id" => 5 });
    assert_eq!(q.bind_params(), params! { "id" => 5 });
    assert!(Query::table("users").select("*").bind_params().is_empty());
}

#[test]
fn test_fields_appear_once_in_each_clause() {
    let fields: Params = (0..6).map(|i| (format!("c{i}"), i)).collect();
    let sql = Query::table("t").values(fields.clone()).to_sql();
    for key in fields.keys() {
        assert_eq!(sql.matches(&format!(":{key},")).count() + sql.matches(&format!(":{key})")).count(), 1);
    }
}

#[test]
fn test_default_is_empty_configuration() {
    let q = Query::default();
    assert_eq!(q.table_name(), "");
    assert!(q.selected().is_none());
    assert!(q.filter_clause().is_none());
    assert!(q.sort_columns().is_empty());
    assert!(q.limit_value().is_none());
    assert!(q.mutation().is_none());
    assert!(!q.safety_disabled());
}
