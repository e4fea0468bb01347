//! Gateway integration tests.
//!
//! Runs the four operations against a live server. Each test works on its
//! own tables so the tests can run in parallel.

use mysql_mcp_gateway::config::ConnectionConfig;
use mysql_mcp_gateway::error::GatewayError;
use mysql_mcp_gateway::gateway::QueryGateway;
use sqlx::{Connection, MySqlConnection};

/// Helper to get test connection config from environment.
fn get_test_config() -> Option<ConnectionConfig> {
    let url = std::env::var("DATABASE_URL").ok()?;
    ConnectionConfig::from_connection_string(&url).ok()
}

/// Runs setup statements on a plain autocommit connection.
///
/// The gateway never commits, so fixtures are written around it.
async fn setup(config: &ConnectionConfig, statements: &[&str]) {
    let mut conn = MySqlConnection::connect_with(&config.to_connect_options())
        .await
        .unwrap();
    for sql in statements {
        sqlx::raw_sql(sql).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_list_databases_includes_configured_database() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let database = config.database.clone().unwrap_or_default();

    let output = QueryGateway::new(config).list_databases().await.unwrap();

    assert!(output.lines().any(|name| name == "information_schema"));
    if !database.is_empty() {
        assert!(output.lines().any(|name| name == database));
    }
}

#[tokio::test]
async fn test_list_tables_reports_created_tables() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    setup(
        &config,
        &[
            "CREATE TABLE IF NOT EXISTS gw_list_users (id INT PRIMARY KEY)",
            "CREATE TABLE IF NOT EXISTS gw_list_orders (id INT PRIMARY KEY)",
        ],
    )
    .await;

    let output = QueryGateway::new(config.clone()).list_tables().await.unwrap();

    assert!(output.lines().any(|name| name == "gw_list_users"));
    assert!(output.lines().any(|name| name == "gw_list_orders"));
    assert!(!output.ends_with('\n'));

    setup(&config, &["DROP TABLE gw_list_users", "DROP TABLE gw_list_orders"]).await;
}

#[tokio::test]
async fn test_execute_query_formats_rows() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let output = QueryGateway::new(config)
        .execute_query("SELECT 1 AS num, 'hello' AS greeting, NULL AS nothing")
        .await
        .unwrap();

    assert_eq!(output, "num\tgreeting\tnothing\n1\thello\tNone\n");
}

#[tokio::test]
async fn test_execute_query_empty_result() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let output = QueryGateway::new(config)
        .execute_query("SELECT 1 AS num FROM DUAL WHERE 1 = 0")
        .await
        .unwrap();

    assert_eq!(output, "No results found.");
}

#[tokio::test]
async fn test_execute_query_syntax_error() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let error = QueryGateway::new(config)
        .execute_query("SELEKT * FROM x")
        .await
        .unwrap_err();

    assert!(matches!(error, GatewayError::Query(_)));
    assert!(error.to_string().contains("1064"));
}

#[tokio::test]
async fn test_execute_query_rejects_multiple_statements() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let error = QueryGateway::new(config)
        .execute_query("SELECT 1; SELECT 2")
        .await
        .unwrap_err();

    assert!(matches!(error, GatewayError::Query(_)));
}

#[tokio::test]
async fn test_get_table_schema_rejects_trailing_statement() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    setup(
        &config,
        &[
            "CREATE TABLE IF NOT EXISTS gw_trailing_users (id INT PRIMARY KEY)",
            "DELETE FROM gw_trailing_users",
            "INSERT INTO gw_trailing_users VALUES (1)",
        ],
    )
    .await;
    let gateway = QueryGateway::new(config.clone());

    let error = gateway
        .get_table_schema("gw_trailing_users; DELETE FROM gw_trailing_users")
        .await
        .unwrap_err();
    assert!(matches!(error, GatewayError::Query(_)));

    let output = gateway
        .execute_query("SELECT id FROM gw_trailing_users")
        .await
        .unwrap();
    assert_eq!(output, "id\n1\n");

    setup(&config, &["DROP TABLE gw_trailing_users"]).await;
}

#[tokio::test]
async fn test_execute_query_write_is_rejected_and_rolled_back() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    setup(
        &config,
        &[
            "CREATE TABLE IF NOT EXISTS gw_write_users (id INT PRIMARY KEY)",
            "DELETE FROM gw_write_users",
        ],
    )
    .await;
    let gateway = QueryGateway::new(config.clone());

    let error = gateway
        .execute_query("INSERT INTO gw_write_users VALUES (1)")
        .await
        .unwrap_err();
    assert!(matches!(error, GatewayError::Query(_)));
    assert!(error.to_string().contains("No result set to fetch from"));

    let output = gateway
        .execute_query("SELECT id FROM gw_write_users")
        .await
        .unwrap();
    assert_eq!(output, "No results found.");

    setup(&config, &["DROP TABLE gw_write_users"]).await;
}

#[tokio::test]
async fn test_get_table_schema_describes_columns() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    setup(
        &config,
        &["CREATE TABLE IF NOT EXISTS gw_schema_users (\
             id INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
             email VARCHAR(255) NULL)"],
    )
    .await;

    let output = QueryGateway::new(config.clone())
        .get_table_schema("gw_schema_users")
        .await
        .unwrap();

    assert!(output.starts_with("Schema for table 'gw_schema_users':\n"));
    assert!(output.contains("Column: id\n"));
    assert!(output.contains("Key: PRI\n"));
    assert!(output.contains("Extra: auto_increment\n"));
    assert!(output.contains("Column: email\n"));
    assert!(output.contains("Null: YES\n"));
    assert_eq!(output.matches("Column: ").count(), 2);

    setup(&config, &["DROP TABLE gw_schema_users"]).await;
}

#[tokio::test]
async fn test_get_table_schema_missing_table() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let error = QueryGateway::new(config)
        .get_table_schema("gw_table_that_does_not_exist")
        .await
        .unwrap_err();

    assert!(matches!(error, GatewayError::Query(_)));
    assert!(error.to_string().contains("1146"));
}
