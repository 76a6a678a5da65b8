use serde_json::json;
use sqlweave::{DbType, DialectProfile, SqlArgument, SqlBuilder, SqlQuery, SqlResult, SqlString, SqlValue, args};
use std::time::Duration;

#[test]
fn query_serializes_text_and_typed_arguments() -> SqlResult<()> {
    let query = SqlBuilder::new(DialectProfile::mssql())
        .select(["Id"])?
        .from("Customers")?
        .where_col("Name")?
        .is_like("Fr%")?
        .and_where_col("Deleted")?
        .is_equal_to(None::<bool>)?
        .to_sql_query()?;

    let value = serde_json::to_value(&query).expect("serialize");
    assert_eq!(
        value,
        json!({
            "command_text": "SELECT [Id] FROM [Customers] WHERE ([Name] LIKE @p0) AND ([Deleted] = @p1)",
            "arguments": [
                { "value": "Fr%", "db_type": "String" },
                { "value": null, "db_type": "Object" },
            ],
        })
    );
    Ok(())
}

#[test]
fn timeout_is_serialized_only_when_set() {
    let plain = serde_json::to_value(SqlQuery::new("SELECT 1", args![])).expect("serialize");
    assert!(plain.get("timeout").is_none());

    let timed = SqlQuery::new("SELECT 1", args![]).with_timeout(Duration::from_secs(3));
    let value = serde_json::to_value(&timed).expect("serialize");
    assert_eq!(value["timeout"], json!({ "secs": 3, "nanos": 0 }));
}

#[test]
fn explicit_db_type_overrides_inference() {
    let argument = SqlArgument::typed("2024-01-01", DbType::Date);
    let value = serde_json::to_value(&argument).expect("serialize");
    assert_eq!(value, json!({ "value": "2024-01-01", "db_type": "Date" }));
    assert_eq!(argument.value(), &SqlValue::from("2024-01-01"));
}

#[test]
fn parsed_clauses_serialize_with_sql_names() {
    let parsed = SqlString::parse_all("SELECT Id FROM T WHERE Id = ? ORDER BY Id");
    let value = serde_json::to_value(&parsed).expect("serialize");
    assert_eq!(
        value,
        json!({
            "select": "Id",
            "from": "T",
            "where": "Id = ?",
            "group_by": "",
            "order_by": "Id",
        })
    );
}
