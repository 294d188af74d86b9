//! Placeholder collection, NULL-aware IN lists, named statements and
//! literal inlining.

use chrono::TimeZone;
use uuid::Uuid;

use super::{post, user};
use crate::prelude::*;

#[test]
fn test_placeholders_follow_textual_order() {
    let user = user();
    let compiled = user
        .select(())
        .where_(user.col("name").equals("a"))
        .and(user.col("email").equals("b"))
        .limit(5)
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT * FROM "user" WHERE (("user"."name" = $1) AND ("user"."email" = $2)) LIMIT $3"#
    );
    assert_eq!(
        compiled.values,
        vec![Value::from("a"), Value::from("b"), Value::Int(5)]
    );
}

#[test]
fn test_subquery_shares_the_parameter_buffer() {
    let post = post();
    let sub = post
        .select(post.col("id"))
        .where_(post.col("title").equals("intro"))
        .limit(10)
        .as_alias("p");
    let compiled = select(Column::new("id"))
        .from(sub)
        .where_(Column::new("id").equals(7))
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT "id" FROM (SELECT "post"."id" FROM "post" WHERE ("post"."title" = $1) LIMIT $2) "p" WHERE ("id" = $3)"#
    );
    assert_eq!(
        compiled.values,
        vec![Value::from("intro"), Value::Int(10), Value::Int(7)]
    );
}

#[test]
fn test_in_list() {
    let user = user();
    let compiled = user
        .select(())
        .where_(user.col("id").in_list(vec![Value::Int(1), Value::Int(2)]))
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT * FROM "user" WHERE ("user"."id" IN ($1, $2))"#
    );
    assert_eq!(compiled.values, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_in_list_with_null_splits_into_is_null() {
    let user = user();
    let compiled = user
        .select(())
        .where_(
            user.col("id")
                .in_list(vec![Value::Int(1), Value::Null, Value::Int(2)]),
        )
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT * FROM "user" WHERE ("user"."id" IN ($1, $2) OR "user"."id" IS NULL)"#
    );
    // The NULL entry becomes a predicate, not a bound value.
    assert_eq!(compiled.values, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_not_in_list_with_null() {
    let user = user();
    let compiled = user
        .select(())
        .where_(user.col("id").not_in_list(vec![Value::Int(1), Value::Null]))
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT * FROM "user" WHERE (NOT ("user"."id" IN ($1) OR "user"."id" IS NULL))"#
    );
}

#[test]
fn test_empty_in_lists_collapse_to_constants() {
    let user = user();
    let compiled = user
        .select(())
        .where_(user.col("id").in_list(Vec::<Node>::new()))
        .to_query()
        .unwrap();
    assert_eq!(compiled.text, r#"SELECT * FROM "user" WHERE (1=0)"#);

    let compiled = user
        .select(())
        .where_(user.col("id").not_in_list(Vec::<Node>::new()))
        .to_query()
        .unwrap();
    assert_eq!(compiled.text, r#"SELECT * FROM "user" WHERE (1=1)"#);
}

#[test]
fn test_named_query() {
    let user = user();
    let compiled = user
        .select(user.col("id"))
        .to_named_query("find_user", Dialect::Postgres)
        .unwrap();
    assert_eq!(compiled.name.as_deref(), Some("find_user"));
    assert_eq!(compiled.text, r#"SELECT "user"."id" FROM "user""#);
}

#[test]
fn test_named_query_rejects_empty_name() {
    let user = user();
    let err = user
        .select(user.col("id"))
        .to_named_query("", Dialect::Postgres)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration: query name must not be empty"
    );
}

#[test]
fn test_literal_booleans() {
    let user = user();
    let q = user.select(()).where_(user.col("active").equals(true));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."active" = TRUE)"#
    );
    assert_eq!(
        q.to_sql_string(Dialect::Sqlite).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."active" = 1)"#
    );
    assert_eq!(
        q.to_sql_string(Dialect::Oracle).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."active" = 1)"#
    );
}

#[test]
fn test_literal_strings_escape_quotes() {
    let user = user();
    let q = user.select(()).where_(user.col("name").equals("O'Brien"));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."name" = 'O''Brien')"#
    );
}

#[test]
fn test_literal_null() {
    let user = user();
    let q = user.select(()).where_(user.col("name").equals(Value::Null));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."name" = NULL)"#
    );
}

#[test]
fn test_literal_dates() {
    let user = user();
    let dt = chrono::Utc.with_ymd_and_hms(2020, 5, 4, 13, 14, 15).unwrap();
    let q = user
        .select(())
        .where_(user.col("created_at").equals(Value::DateTime(dt)));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."created_at" = '2020-05-04T13:14:15.000Z')"#
    );

    // SQLite with epoch-millisecond storage renders a bare number.
    let config = DialectConfig {
        date_time_millis: true,
        ..DialectConfig::default()
    };
    assert_eq!(
        q.to_sql_string_with_config(Dialect::Sqlite, &config).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."created_at" = 1588598055000)"#
    );
}

#[test]
fn test_literal_dates_before_year_one() {
    let user = user();
    let dt = chrono::Utc.with_ymd_and_hms(-5, 1, 2, 3, 4, 5).unwrap();
    let q = user
        .select(())
        .where_(user.col("created_at").equals(Value::DateTime(dt)));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."created_at" = '0006-01-02T03:04:05.000Z BC')"#
    );
}

#[test]
fn test_literal_bytes() {
    let user = user();
    let q = user
        .select(())
        .where_(user.col("data").equals(Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef])));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."data" = '\xdeadbeef')"#
    );
    assert_eq!(
        q.to_sql_string(Dialect::Mysql).unwrap(),
        r"SELECT * FROM `user` WHERE (`user`.`data` = x'deadbeef')"
    );
    assert_eq!(
        q.to_sql_string(Dialect::Mssql).unwrap(),
        r"SELECT * FROM [user] WHERE ([user].[data] = 0xdeadbeef)"
    );
    assert_eq!(
        q.to_sql_string(Dialect::Oracle).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."data" = utl_raw.cast_to_varchar2(hextoraw('deadbeef')))"#
    );
}

#[test]
fn test_literal_arrays() {
    let user = user();
    let ints = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    let q = user.select(()).where_(user.col("tags").equals(ints));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."tags" = '{1,2,3}')"#
    );

    let strings = Value::Array(vec![Value::from("a"), Value::from("b")]);
    let q = user.select(()).where_(user.col("tags").equals(strings));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."tags" = '{"a","b"}')"#
    );
    assert_eq!(
        q.to_sql_string(Dialect::Mysql).unwrap(),
        r#"SELECT * FROM `user` WHERE (`user`.`tags` = ('a', 'b'))"#
    );
    assert_eq!(
        q.to_sql_string(Dialect::Sqlite).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."tags" = '["a","b"]')"#
    );
}

#[test]
fn test_literal_uuid() {
    let user = user();
    let q = user
        .select(())
        .where_(user.col("id").equals(Value::Uuid(Uuid::nil())));
    assert_eq!(
        q.to_sql_string(Dialect::Postgres).unwrap(),
        r#"SELECT * FROM "user" WHERE ("user"."id" = '00000000-0000-0000-0000-000000000000')"#
    );
}

#[test]
fn test_explicit_parameter_joins_sequence_without_placeholder() {
    let user = user();
    let compiled = user
        .select(())
        .where_(user.col("id").equals(param(42)))
        .parameter(7)
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT * FROM "user" WHERE ("user"."id" = $1)"#
    );
    assert_eq!(compiled.values, vec![Value::Int(42), Value::Int(7)]);
}
