//! CREATE / DROP / ALTER TABLE, indexes and views.

use pretty_assertions::assert_eq;

use super::user;
use crate::ast::{ForeignKeyNode, ReferentialAction};
use crate::prelude::*;

fn account() -> Table {
    Table::new("account").columns(vec![
        Column::new("id").data_type("serial").primary_key(),
        Column::new("email").data_type("varchar(255)").not_null().unique(),
        Column::new("role").data_type("varchar(16)").default_value("user"),
    ])
}

#[test]
fn test_create_table() {
    let compiled = account().create().to_query().unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE TABLE "account" ("id" serial PRIMARY KEY, "email" varchar(255) NOT NULL UNIQUE, "role" varchar(16) DEFAULT 'user')"#
    );
}

#[test]
fn test_create_table_if_not_exists() {
    let compiled = account().create().if_not_exists().to_query().unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE TABLE IF NOT EXISTS "account" ("id" serial PRIMARY KEY, "email" varchar(255) NOT NULL UNIQUE, "role" varchar(16) DEFAULT 'user')"#
    );
}

#[test]
fn test_create_temporary_table() {
    let scratch = Table::new("scratch")
        .temporary()
        .columns(vec![Column::new("id").data_type("int")]);
    assert_eq!(
        scratch.create().to_query().unwrap().text,
        r#"CREATE TEMPORARY TABLE "scratch" ("id" int)"#
    );
    assert_eq!(
        scratch.create().to_query_with(Dialect::Oracle).unwrap().text,
        r#"CREATE GLOBAL TEMPORARY TABLE "scratch" ("id" int)"#
    );
}

#[test]
fn test_create_table_requires_data_types() {
    let bad = Table::new("bad").columns(vec![Column::new("id")]);
    let err = bad.create().to_query().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required attribute: dataType missing for column id"
    );
}

#[test]
fn test_compound_primary_key() {
    let membership = Table::new("membership").columns(vec![
        Column::new("userId").data_type("int").primary_key(),
        Column::new("groupId").data_type("int").primary_key(),
    ]);
    let compiled = membership.create().to_query().unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE TABLE "membership" ("userId" int, "groupId" int, PRIMARY KEY ("userId", "groupId"))"#
    );
}

#[test]
fn test_column_references() {
    let post = Table::new("post").columns(vec![
        Column::new("id").data_type("serial").primary_key(),
        Column::new("userId").data_type("int").references(ForeignRef {
            table: Some("user".to_string()),
            column: Some("id".to_string()),
            on_delete: Some(ReferentialAction::Cascade),
            ..ForeignRef::default()
        }),
    ]);
    let compiled = post.create().to_query().unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE TABLE "post" ("id" serial PRIMARY KEY, "userId" int REFERENCES "user"("id") ON DELETE CASCADE)"#
    );
}

#[test]
fn test_partial_reference_is_an_error() {
    let post = Table::new("post").columns(vec![
        Column::new("userId").data_type("int").references(ForeignRef {
            table: Some("user".to_string()),
            ..ForeignRef::default()
        }),
    ]);
    let err = post.create().to_query().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required attribute: reference column missing for column userId"
    );
}

#[test]
fn test_table_level_foreign_key() {
    let membership = Table::new("membership")
        .columns(vec![
            Column::new("userId").data_type("int"),
            Column::new("groupId").data_type("int"),
        ])
        .foreign_key(ForeignKeyNode {
            name: Some("fk_membership_user".to_string()),
            table: "user".to_string(),
            columns: vec!["userId".to_string()],
            ref_columns: vec!["id".to_string()],
            on_delete: Some(ReferentialAction::Cascade),
            ..ForeignKeyNode::default()
        });
    let compiled = membership.create().to_query().unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE TABLE "membership" ("userId" int, "groupId" int, CONSTRAINT "fk_membership_user" FOREIGN KEY ("userId") REFERENCES "user" ("id") ON DELETE CASCADE)"#
    );
}

#[test]
fn test_mysql_table_options() {
    let t = Table::new("log")
        .engine("InnoDB")
        .charset("utf8mb4")
        .columns(vec![Column::new("id").data_type("int")]);
    let compiled = t.create().to_query_with(Dialect::Mysql).unwrap();
    assert_eq!(
        compiled.text,
        r"CREATE TABLE `log` (`id` int) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"
    );
}

#[test]
fn test_oracle_create_if_not_exists_block() {
    let t = Table::new("account").columns(vec![Column::new("id").data_type("number")]);
    let compiled = t
        .create()
        .if_not_exists()
        .to_query_with(Dialect::Oracle)
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"BEGIN EXECUTE IMMEDIATE 'CREATE TABLE "account" ("id" number)'; EXCEPTION WHEN OTHERS THEN IF SQLCODE != -955 THEN RAISE; END IF; END;"#
    );
}

#[test]
fn test_drop_table() {
    let user = user();
    assert_eq!(user.drop().to_query().unwrap().text, r#"DROP TABLE "user""#);
    assert_eq!(
        user.drop().if_exists().to_query().unwrap().text,
        r#"DROP TABLE IF EXISTS "user""#
    );
    assert_eq!(
        user.drop().cascade().to_query().unwrap().text,
        r#"DROP TABLE "user" CASCADE"#
    );
    assert_eq!(
        user.drop().restrict().to_query().unwrap().text,
        r#"DROP TABLE "user" RESTRICT"#
    );
}

#[test]
fn test_oracle_drop_variants() {
    let user = user();
    assert_eq!(
        user.drop().if_exists().to_query_with(Dialect::Oracle).unwrap().text,
        r#"BEGIN EXECUTE IMMEDIATE 'DROP TABLE "user"'; EXCEPTION WHEN OTHERS THEN IF SQLCODE != -942 THEN RAISE; END IF; END;"#
    );
    assert_eq!(
        user.drop().cascade().to_query_with(Dialect::Oracle).unwrap().text,
        r#"DROP TABLE "user" CASCADE CONSTRAINTS"#
    );
}

#[test]
fn test_sqlite_rejects_drop_cascade() {
    let user = user();
    let err = user
        .drop()
        .cascade()
        .to_query_with(Dialect::Sqlite)
        .unwrap_err();
    assert_eq!(err.to_string(), "SQLite does not support CASCADE in DROP TABLE");
}

#[test]
fn test_alter_add_and_drop_column() {
    let user = user();
    let compiled = user
        .alter()
        .add_column(Column::new("age").data_type("integer"))
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"ALTER TABLE "user" ADD COLUMN "age" integer"#
    );

    let compiled = user
        .alter()
        .add_column(Column::new("age").data_type("integer"))
        .drop_column(user.col("name"))
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"ALTER TABLE "user" ADD COLUMN "age" integer, DROP COLUMN "name""#
    );
}

#[test]
fn test_rename_column() {
    let user = user();
    let compiled = user
        .alter()
        .rename_column(user.col("name"), Column::new("full_name"))
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"ALTER TABLE "user" RENAME COLUMN "name" TO "full_name""#
    );
}

#[test]
fn test_mysql_change_column_resolves_type() {
    let user = user();
    let compiled = user
        .alter()
        .rename_column(user.col("name"), Column::new("full_name"))
        .to_query_with(Dialect::Mysql)
        .unwrap();
    assert_eq!(
        compiled.text,
        r"ALTER TABLE `user` CHANGE COLUMN `name` `full_name` varchar(255)"
    );
}

#[test]
fn test_mysql_change_column_without_type() {
    let user = user();
    let err = user
        .alter()
        .rename_column(Column::new("nickname"), Column::new("handle"))
        .to_query_with(Dialect::Mysql)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required attribute: dataType missing for column handle"
    );
}

#[test]
fn test_rename_table() {
    let user = user();
    let compiled = user.alter().rename("person").to_query().unwrap();
    assert_eq!(compiled.text, r#"ALTER TABLE "user" RENAME TO "person""#);
}

#[test]
fn test_sqlite_alter_restrictions() {
    let user = user();
    let err = user
        .alter()
        .add_column(Column::new("a").data_type("int"))
        .add_column(Column::new("b").data_type("int"))
        .to_query_with(Dialect::Sqlite)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "SQLite does not support adding more than one column per ALTER"
    );

    let err = user
        .alter()
        .drop_column(user.col("name"))
        .to_query_with(Dialect::Sqlite)
        .unwrap_err();
    assert_eq!(err.to_string(), "SQLite does not support dropping columns");
}

#[test]
fn test_oracle_combined_alter() {
    let user = user();
    let compiled = user
        .alter()
        .add_column(Column::new("a").data_type("int"))
        .add_column(Column::new("b").data_type("int"))
        .drop_column(user.col("name"))
        .to_query_with(Dialect::Oracle)
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"ALTER TABLE "user" ADD ("a" int, "b" int) DROP ("name")"#
    );
}

#[test]
fn test_create_index() {
    let user = user();
    let compiled = user
        .create_index("user_email_idx")
        .unique()
        .columns(user.col("email"))
        .build()
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE UNIQUE INDEX "user_email_idx" ON "user" ("email")"#
    );
}

#[test]
fn test_create_index_derives_a_name() {
    let user = user();
    let compiled = user
        .index()
        .columns((user.col("email"), user.col("name")))
        .build()
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE INDEX "user_email_name" ON "user" ("email", "name")"#
    );
}

#[test]
fn test_create_index_with_direction_and_algorithm() {
    let user = user();
    let compiled = user
        .create_index("user_name_idx")
        .using("btree")
        .columns(user.col("name").descending())
        .build()
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE INDEX "user_name_idx" USING BTREE ON "user" ("name" DESC)"#
    );
}

#[test]
fn test_mysql_fulltext_index_with_parser() {
    let user = user();
    let compiled = user
        .create_index("user_name_ft")
        .kind("FULLTEXT")
        .parser("ngram")
        .columns(user.col("name"))
        .build()
        .to_query_with(Dialect::Mysql)
        .unwrap();
    assert_eq!(
        compiled.text,
        r"CREATE FULLTEXT INDEX `user_name_ft` ON `user` (`name`) WITH PARSER ngram"
    );
}

#[test]
fn test_create_index_requires_columns() {
    let user = user();
    let err = user.create_index("empty").build().to_query().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required attribute: no columns defined for index"
    );
}

#[test]
fn test_drop_index() {
    let user = user();
    assert_eq!(
        user.drop_index("user_email_idx").to_query().unwrap().text,
        r#"DROP INDEX "public"."user_email_idx""#
    );
    assert_eq!(
        user.drop_index("user_email_idx")
            .to_query_with(Dialect::Mysql)
            .unwrap()
            .text,
        r"DROP INDEX `user_email_idx` ON `user`"
    );
    assert_eq!(
        user.drop_index("user_email_idx")
            .to_query_with(Dialect::Sqlite)
            .unwrap()
            .text,
        r#"DROP INDEX "user_email_idx""#
    );
    assert_eq!(
        user.drop_index("user_email_idx")
            .to_query_with(Dialect::Oracle)
            .unwrap()
            .text,
        r#"DROP INDEX "user_email_idx""#
    );
}

#[test]
fn test_index_listing() {
    let user = user();
    assert_eq!(
        user.indexes().to_query().unwrap().text,
        "SELECT relname FROM pg_class WHERE oid IN ( SELECT indexrelid FROM pg_index, pg_class WHERE pg_class.relname = 'user' AND pg_class.relnamespace IN ( SELECT pg_namespace.oid FROM pg_namespace WHERE nspname = 'public') AND pg_class.oid = pg_index.indrelid)"
    );
    assert_eq!(
        user.indexes().to_query_with(Dialect::Mysql).unwrap().text,
        r"SHOW INDEX FROM `user`"
    );
    assert_eq!(
        user.indexes().to_query_with(Dialect::Sqlite).unwrap().text,
        r#"PRAGMA INDEX_LIST("user")"#
    );
    assert_eq!(
        user.indexes().to_query_with(Dialect::Oracle).unwrap().text,
        r"SELECT * FROM USER_INDEXES WHERE TABLE_NAME = 'user'"
    );
}

#[test]
fn test_create_view_inlines_values() {
    let user = user();
    let compiled = user
        .select(())
        .where_(user.col("active").equals(true))
        .create_view("active_users")
        .to_query()
        .unwrap();
    assert_eq!(
        compiled.text,
        r#"CREATE VIEW "active_users" AS SELECT * FROM "user" WHERE ("user"."active" = TRUE)"#
    );
    assert!(compiled.values.is_empty());
}

#[test]
fn test_create_view_requires_a_select() {
    let user = user();
    let err = user.delete().create_view("nope").to_query().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required attribute: CREATE VIEW requires a SELECT"
    );
}

#[test]
fn test_schema_qualified_table() {
    let audit = Table::new("event").schema("audit");
    let compiled = audit.select(()).to_query().unwrap();
    assert_eq!(compiled.text, r#"SELECT * FROM "audit"."event""#);
}
