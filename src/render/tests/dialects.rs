//! Per-dialect quoting, placeholder styles and statement rewrites.

use super::{post, user};
use crate::prelude::*;

fn lookup(user: &Table) -> Query {
    user.select(user.col("id"))
        .where_(user.col("email").equals("alice@example.com"))
}

#[test]
fn test_postgres_dialect() {
    let user = user();
    let compiled = lookup(&user).to_query_with(Dialect::Postgres).unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT "user"."id" FROM "user" WHERE ("user"."email" = $1)"#
    );
}

#[test]
fn test_mysql_dialect() {
    let user = user();
    let compiled = lookup(&user).to_query_with(Dialect::Mysql).unwrap();
    assert_eq!(
        compiled.text,
        r"SELECT `user`.`id` FROM `user` WHERE (`user`.`email` = ?)"
    );
}

#[test]
fn test_sqlite_dialect() {
    let user = user();
    let compiled = lookup(&user).to_query_with(Dialect::Sqlite).unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT "user"."id" FROM "user" WHERE ("user"."email" = ?)"#
    );
}

#[test]
fn test_mssql_dialect() {
    let user = user();
    let compiled = lookup(&user).to_query_with(Dialect::Mssql).unwrap();
    assert_eq!(
        compiled.text,
        r"SELECT [user].[id] FROM [user] WHERE ([user].[email] = @1)"
    );
}

#[test]
fn test_oracle_dialect() {
    let user = user();
    let compiled = lookup(&user).to_query_with(Dialect::Oracle).unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT "user"."id" FROM "user" WHERE ("user"."email" = :1)"#
    );
}

#[test]
fn test_quote_doubling() {
    let table = Table::new(r#"we"ird"#);
    let compiled = table.select(()).to_query().unwrap();
    assert_eq!(compiled.text, r#"SELECT * FROM "we""ird""#);
}

#[test]
fn test_mssql_rejects_closing_bracket() {
    let table = Table::new("nope]");
    let err = table.select(()).to_query_with(Dialect::Mssql).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration: identifier nope] cannot be quoted with brackets"
    );
}

#[test]
fn test_mssql_placeholder_char_override() {
    let user = user();
    let config = DialectConfig {
        placeholder_char: Some('$'),
        ..DialectConfig::default()
    };
    let compiled = lookup(&user)
        .to_query_with_config(Dialect::Mssql, &config)
        .unwrap();
    assert_eq!(
        compiled.text,
        r"SELECT [user].[id] FROM [user] WHERE ([user].[email] = $1)"
    );
}

#[test]
fn test_oracle_offset_precedes_fetch() {
    let user = user();
    let compiled = user
        .select(())
        .limit(10)
        .offset(20)
        .to_query_with(Dialect::Oracle)
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT * FROM "user" OFFSET :2 ROWS FETCH NEXT :1 ROWS ONLY"#
    );
    assert_eq!(compiled.values, vec![Value::Int(10), Value::Int(20)]);
}

#[test]
fn test_oracle_alias_without_keyword() {
    let user = user();
    let compiled = user
        .select(user.col("name").as_alias("n"))
        .to_query_with(Dialect::Oracle)
        .unwrap();
    assert_eq!(compiled.text, r#"SELECT "user"."name" "n" FROM "user""#);

    let u = user.as_alias("u");
    let compiled = u.select(u.col("id")).to_query_with(Dialect::Oracle).unwrap();
    assert_eq!(compiled.text, r#"SELECT "u"."id" FROM "user" "u""#);
}

#[test]
fn test_postgres_null_ordering() {
    let user = user();
    let config = DialectConfig {
        null_order: Some(NullOrder::First),
        ..DialectConfig::default()
    };
    let compiled = user
        .select(())
        .order(user.col("name").descending())
        .to_query_with_config(Dialect::Postgres, &config)
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT * FROM "user" ORDER BY "user"."name" DESC NULLS FIRST"#
    );
}

#[test]
fn test_match_predicates() {
    let user = user();
    let q = user.select(()).where_(user.col("name").matches("bob"));
    assert_eq!(
        q.to_query_with(Dialect::Postgres).unwrap().text,
        r#"SELECT * FROM "user" WHERE ("user"."name" @@ $1)"#
    );
    assert_eq!(
        q.to_query_with(Dialect::Mysql).unwrap().text,
        r"SELECT * FROM `user` WHERE (MATCH `user`.`name` AGAINST (?))"
    );
    assert_eq!(
        q.to_query_with(Dialect::Sqlite).unwrap().text,
        r#"SELECT * FROM "user" WHERE "user"."name" MATCH ?"#
    );
}

#[test]
fn test_date_part_functions() {
    let user = user();
    let q = user.select(function("YEAR", user.col("created_at")));
    assert_eq!(
        q.to_query_with(Dialect::Postgres).unwrap().text,
        r#"SELECT EXTRACT(YEAR FROM "user"."created_at") FROM "user""#
    );
    assert_eq!(
        q.to_query_with(Dialect::Mysql).unwrap().text,
        r"SELECT YEAR(`user`.`created_at`) FROM `user`"
    );
    assert_eq!(
        q.to_query_with(Dialect::Sqlite).unwrap().text,
        r#"SELECT STRFTIME('%Y', "user"."created_at") FROM "user""#
    );

    let config = DialectConfig {
        date_time_millis: true,
        ..DialectConfig::default()
    };
    assert_eq!(
        q.to_query_with_config(Dialect::Sqlite, &config).unwrap().text,
        r#"SELECT STRFTIME('%Y', "user"."created_at" / 1000, 'UNIXEPOCH') FROM "user""#
    );
}

#[test]
fn test_sqlite_left_and_right() {
    let user = user();
    let compiled = user
        .select(function("LEFT", (user.col("name"), param(4))))
        .to_query_with(Dialect::Sqlite)
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT SUBSTR("user"."name", 1, ?) FROM "user""#
    );

    let compiled = user
        .select(function("RIGHT", (user.col("name"), param(4))))
        .to_query_with(Dialect::Sqlite)
        .unwrap();
    assert_eq!(compiled.text, r#"SELECT SUBSTR("user"."name", -?) FROM "user""#);
}

#[test]
fn test_array_aggregation() {
    let user = user();
    let q = user.select(user.col("name").as_array());
    assert_eq!(
        q.to_query_with(Dialect::Postgres).unwrap().text,
        r#"SELECT array_agg("user"."name") FROM "user""#
    );
    assert_eq!(
        q.to_query_with(Dialect::Mysql).unwrap().text,
        r"SELECT GROUP_CONCAT(`user`.`name`) FROM `user`"
    );
    assert_eq!(
        q.to_query_with(Dialect::Sqlite).unwrap().text,
        r#"SELECT GROUP_CONCAT("user"."name") FROM "user""#
    );

    let err = q.to_query_with(Dialect::Oracle).unwrap_err();
    assert_eq!(err.to_string(), "Oracle does not support array aggregation");
}

#[test]
fn test_oracle_rejects_array_expressions() {
    let compiled = select(array((param(1), param(2)))).to_query_with(Dialect::Oracle);
    assert_eq!(
        compiled.unwrap_err().to_string(),
        "Oracle does not support array expressions"
    );
}

#[test]
fn test_truncate() {
    let user = user();
    assert_eq!(
        user.truncate().to_query_with(Dialect::Postgres).unwrap().text,
        r#"TRUNCATE TABLE "user""#
    );
    assert_eq!(
        user.truncate().to_query_with(Dialect::Sqlite).unwrap().text,
        r#"DELETE FROM "user""#
    );
}

#[test]
fn test_mysql_multi_table_delete() {
    let user = user();
    let post = post();
    let compiled = user
        .delete_tables(vec![&user])
        .from(
            user.join(&post)
                .on(user.col("id").equals(post.col("userId"))),
        )
        .where_(post.col("title").equals("spam"))
        .to_query_with(Dialect::Mysql)
        .unwrap();
    assert_eq!(
        compiled.text,
        r"DELETE `user` FROM `user` INNER JOIN `post` ON (`user`.`id` = `post`.`userId`) WHERE (`post`.`title` = ?)"
    );
}

#[test]
fn test_oracle_case_boolean_predicates() {
    let user = user();
    let compiled = user
        .select(case(param(true), param(1), Some(param(0))))
        .to_query_with(Dialect::Oracle)
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"SELECT (CASE WHEN 1 = 1 THEN :1 ELSE :2 END) FROM "user""#
    );
    assert_eq!(compiled.values, vec![Value::Int(1), Value::Int(0)]);
}

#[test]
fn test_dialect_lookup_by_name() {
    assert_eq!(Dialect::from_name("postgresql").unwrap(), Dialect::Postgres);
    assert_eq!(Dialect::from_name("pg").unwrap(), Dialect::Postgres);
    assert_eq!(Dialect::from_name("mariadb").unwrap(), Dialect::Mysql);
    assert_eq!(Dialect::from_name("sqlite3").unwrap(), Dialect::Sqlite);
    assert_eq!(Dialect::from_name("SQLServer").unwrap(), Dialect::Mssql);
    assert_eq!(Dialect::from_name("oracle").unwrap(), Dialect::Oracle);

    let err = Dialect::from_name("db2").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration: db2 is not a supported dialect"
    );
}

#[test]
fn test_dialect_display() {
    assert_eq!(Dialect::Postgres.to_string(), "PostgreSQL");
    assert_eq!(Dialect::Mysql.to_string(), "MySQL");
    assert_eq!(Dialect::default(), Dialect::Postgres);
}
