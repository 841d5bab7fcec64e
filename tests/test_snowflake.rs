//! Snowflake scripts through parser, converter and assessment together.

use db2ice::codes::snowflake as codes;
use db2ice::snowflake::{self, SnowflakeTableKind};
use db2ice::{ConversionConfig, IssueSeverity, ReadinessLevel, SnowflakeParser, SnowflakeToIcebergConverter};

const WAREHOUSE_SCRIPT: &str = r#"
-- Sales mart
CREATE OR REPLACE TABLE SALES_DB.MART.ORDERS (
    ORDER_ID NUMBER(38,0) NOT NULL AUTOINCREMENT START 1 INCREMENT 1,
    CUSTOMER_ID NUMBER(38,0) NOT NULL,
    PLACED_AT TIMESTAMP_NTZ(9),
    ATTRIBUTES VARIANT,
    EMAIL VARCHAR(255) WITH MASKING POLICY GOVERNANCE.EMAIL_MASK,
    CONSTRAINT PK_ORDERS PRIMARY KEY (ORDER_ID),
    CONSTRAINT FK_CUSTOMER FOREIGN KEY (CUSTOMER_ID) REFERENCES MART.CUSTOMERS (CUSTOMER_ID)
)
CLUSTER BY (PLACED_AT)
DATA_RETENTION_TIME_IN_DAYS = 30
COMMENT = 'Customer orders';

CREATE TRANSIENT TABLE MART.STAGE_ORDERS (
    RAW VARCHAR DEFAULT '',
    LOADED_AT TIMESTAMP_LTZ
);

CREATE TABLE MART.CUSTOMERS (CUSTOMER_ID NUMBER(38,0) NOT NULL PRIMARY KEY, NAME VARCHAR(100));

CREATE EXTERNAL TABLE MART.EVENTS_EXT
  LOCATION = @RAW_STAGE/events
  FILE_FORMAT = (TYPE = PARQUET);
"#;

fn converter() -> SnowflakeToIcebergConverter {
    SnowflakeToIcebergConverter::new(ConversionConfig::default().with_external_volume("SALES_VOL"))
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_warehouse_script() {
    let mut parser = SnowflakeParser::new();
    let tables = parser.parse(WAREHOUSE_SCRIPT);
    assert!(parser.errors().is_empty());

    let kinds: Vec<SnowflakeTableKind> = tables.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SnowflakeTableKind::Regular,
            SnowflakeTableKind::Transient,
            SnowflakeTableKind::Regular,
            SnowflakeTableKind::External,
        ]
    );

    let orders = &tables[0];
    assert_eq!(orders.database.as_deref(), Some("SALES_DB"));
    assert_eq!(orders.schema.as_deref(), Some("MART"));
    assert_eq!(orders.columns.len(), 5);
    assert_eq!(orders.cluster_by, vec!["PLACED_AT".to_string()]);
    assert_eq!(orders.data_retention_days, Some(30));
    assert_eq!(orders.comment.as_deref(), Some("Customer orders"));
    assert_eq!(orders.columns[4].masking_policy.as_deref(), Some("GOVERNANCE.EMAIL_MASK"));

    assert!(tables[3].columns.is_empty());
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_convert_warehouse_script() {
    let result = converter().convert(WAREHOUSE_SCRIPT);
    assert!(result.success);
    assert_eq!(result.tables_converted, 4);

    let ddl = &result.iceberg_ddl;
    assert!(ddl.contains("CREATE OR REPLACE ICEBERG TABLE SALES_DB.MART.ORDERS ("));
    assert!(ddl.contains("    ORDER_ID NUMBER(38,0) NOT NULL,"));
    assert!(ddl.contains("    PLACED_AT TIMESTAMP_NTZ(6),"));
    assert!(ddl.contains("    ATTRIBUTES VARCHAR,"));
    assert!(ddl.contains("    PRIMARY KEY (ORDER_ID)"));
    assert!(ddl.contains("BASE_LOCATION = 'mart/orders'"));
    assert!(ddl.contains("EXTERNAL_VOLUME = 'SALES_VOL'"));
    assert!(ddl.contains("-- Original CLUSTER BY: (PLACED_AT)"));
    assert!(ddl.contains("-- Table comment: Customer orders"));
    assert!(ddl.contains("-- FOREIGN KEY FK_CUSTOMER: (CUSTOMER_ID) REFERENCES MART.CUSTOMERS(CUSTOMER_ID)"));

    assert!(ddl.contains("CREATE OR REPLACE TRANSIENT TABLE MART.STAGE_ORDERS ("));
    assert!(ddl.contains("    RAW VARCHAR DEFAULT '',"));
    assert!(ddl.contains("CREATE OR REPLACE ICEBERG TABLE MART.CUSTOMERS ("));
    assert!(ddl.contains("-- !!!! EXTERNAL TABLE SKIPPED - Cannot convert to Iceberg !!!!"));

    // identity, precision, variant and masking markers; the skipped table
    // counts once without a marker
    assert_eq!(ddl.matches("!!!RESOLVE EWI!!!").count(), 4);
    assert_eq!(result.ewi_count, 5);
}

#[test]
fn test_issue_severities() {
    let result = converter().convert(WAREHOUSE_SCRIPT);
    let severity_of = |code: &str| {
        result
            .issues
            .iter()
            .find(|i| i.code == code)
            .map(|i| i.severity)
    };

    assert_eq!(severity_of(codes::VARIANT), Some(IssueSeverity::Critical));
    assert_eq!(severity_of(codes::IDENTITY), Some(IssueSeverity::Warning));
    assert_eq!(severity_of(codes::MASKING_POLICY), Some(IssueSeverity::Warning));
    assert_eq!(severity_of(codes::TIMESTAMP_NTZ_PRECISION), Some(IssueSeverity::Info));
    assert_eq!(severity_of(codes::CLUSTER_BY), Some(IssueSeverity::Info));
    assert_eq!(severity_of(codes::DATA_RETENTION), Some(IssueSeverity::Info));
    assert_eq!(severity_of(codes::TRANSIENT_KEPT), Some(IssueSeverity::Info));
    assert_eq!(severity_of(codes::EXTERNAL_SKIPPED), Some(IssueSeverity::Critical));
    assert_eq!(severity_of(codes::TIMESTAMP_LTZ_PRECISION), None);
}

#[test]
fn test_quiet_output_keeps_issues() {
    let config = ConversionConfig::default().with_comments(false).with_ewi(false);
    let result = SnowflakeToIcebergConverter::new(config).convert(WAREHOUSE_SCRIPT);

    assert!(!result.iceberg_ddl.contains("--"));
    assert!(!result.iceberg_ddl.contains("!!!RESOLVE EWI!!!"));
    // Only the skipped external table still counts
    assert_eq!(result.ewi_count, 1);
    assert!(result.issues.iter().any(|i| i.code == codes::VARIANT));
    assert!(!result.iceberg_ddl.contains("\n\n\n"));
}

// ============================================================================
// Assessment
// ============================================================================

#[test]
fn test_assess_warehouse_script() {
    let report = snowflake::assess(WAREHOUSE_SCRIPT, &ConversionConfig::default());
    assert_eq!(report.tables_total, 4);
    assert_eq!(report.tables_auto, 1);
    assert_eq!(report.tables_manual, 2);
    assert_eq!(report.tables_blocked, 1);

    let score_of = |name: &str| {
        report
            .table_assessments
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.readiness_score)
    };
    // 85 (clustered) - 15 (variant) - 5 (identity) - 5 (masking)
    assert_eq!(score_of("SALES_DB.MART.ORDERS"), Some(60.0));
    assert_eq!(score_of("MART.STAGE_ORDERS"), Some(70.0));
    assert_eq!(score_of("MART.CUSTOMERS"), Some(95.0));
    assert_eq!(score_of("MART.EVENTS_EXT"), Some(0.0));

    assert_eq!(report.features_used["external_tables"], 1);
    assert_eq!(report.features_used["masking_policies"], 1);
    assert_eq!(report.features_used["foreign_keys"], 1);
}

#[test]
fn test_assessment_json_shape() {
    let report = snowflake::assess(
        "CREATE TABLE T (A NUMBER, B GEOGRAPHY)",
        &ConversionConfig::default(),
    );
    let json = report.to_json();

    assert_eq!(json["summary"]["tables_total"], 1);
    assert_eq!(json["summary"]["tables_auto_convert"], 1);
    assert_eq!(json["readiness"]["overall_level"], "green");
    assert_eq!(json["issues"]["critical"][0]["code"], codes::GEOGRAPHY);
    // 95 - 15 lands exactly on the green threshold
    assert_eq!(report.table_assessments[0].readiness_score, 80.0);
    assert_eq!(report.table_assessments[0].readiness_level, ReadinessLevel::Green);
}
