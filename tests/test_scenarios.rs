//! End-to-end scenarios across parser, assessor and converters.

use db2ice::codes;
use db2ice::snowflake::SnowflakeToIcebergConverter;
use db2ice::{
    map_type, Assessor, ConversionConfig, ConversionStatus, Db2IceConverter, IssueSeverity,
    ReadinessLevel,
};

// ============================================================================
// DB2
// ============================================================================

#[test]
fn test_xml_column_makes_table_yellow_and_blocked() {
    let report = Assessor::new().assess("CREATE TABLE S.T (A INTEGER NOT NULL, B XML, PRIMARY KEY (A));");

    assert_eq!(report.tables_total, 1);
    assert_eq!(report.critical_issues.len(), 1);
    assert_eq!(report.critical_issues[0].code, codes::db2::XML_UNSUPPORTED);

    let table = &report.table_assessments[0];
    assert!(!table.can_auto_convert);
    assert_eq!(table.readiness_score, 75.0);
    assert_eq!(table.readiness_level, ReadinessLevel::Yellow);
}

#[test]
fn test_volatile_table_kept_as_temporary() {
    let result = Db2IceConverter::new(ConversionConfig::default())
        .convert("CREATE VOLATILE TABLE S.T (A INTEGER NOT NULL, PRIMARY KEY(A));");

    assert!(result.success);
    assert!(result.iceberg_ddl.contains("CREATE OR REPLACE TEMPORARY TABLE"));
    assert!(!result.iceberg_ddl.contains("ICEBERG TABLE"));
    assert_eq!(result.iceberg_ddl.matches("!!!RESOLVE EWI!!!").count(), 1);
    assert!(result
        .iceberg_ddl
        .contains("/*** SSC-EWI-DB2ICE-0030 - VOLATILE table kept as Snowflake TEMPORARY"));
    assert_eq!(result.ewi_count, 1);
}

#[test]
fn test_char_maps_to_varchar() {
    let mapping = map_type("CHAR", Some(10), Some(10), None, false, None);
    assert_eq!(mapping.target_type, "VARCHAR(10)");
    assert_eq!(mapping.status, ConversionStatus::Compatible);
    assert_eq!(mapping.ewi_code, Some(codes::db2::CHAR_TO_VARCHAR));
}

#[test]
fn test_timestamp_precision() {
    let adjusted = map_type("TIMESTAMP", Some(3), Some(3), None, false, None);
    assert_eq!(adjusted.target_type, "TIMESTAMP_NTZ(6)");
    assert_eq!(adjusted.status, ConversionStatus::Compatible);
    assert_eq!(adjusted.ewi_code, Some(codes::db2::TIMESTAMP_PRECISION));

    let plain = map_type("TIMESTAMP", None, None, None, false, None);
    assert_eq!(plain.target_type, "TIMESTAMP_NTZ(6)");
    assert_eq!(plain.status, ConversionStatus::Direct);
    assert_eq!(plain.ewi_code, None);
}

#[test]
fn test_empty_input() {
    for input in ["", "   \n\t  "] {
        let report = Assessor::new().assess(input);
        assert_eq!(report.tables_total, 0);
        assert_eq!(report.critical_issues.len(), 1);
        assert_eq!(report.critical_issues[0].code, codes::db2::NO_TABLES);
        assert_eq!(
            report.critical_issues[0].message,
            "No valid CREATE TABLE statements found in input"
        );

        let result = Db2IceConverter::new(ConversionConfig::default()).convert(input);
        assert!(!result.success);
        assert!(result.error_message.is_some());
        assert!(result.iceberg_ddl.is_empty());
    }
}

#[test]
fn test_mixed_script_conversion() {
    let ddl = r#"
-- Payroll schema
CREATE TABLE PAYROLL.EMPLOYEE (
    EMP_ID      INTEGER NOT NULL GENERATED ALWAYS AS IDENTITY (START WITH 1, INCREMENT BY 1),
    LAST_NAME   VARCHAR(40) NOT NULL,
    "Order"     CHAR(2),
    SALARY      DECIMAL(9,2) DEFAULT 0,
    HIRED       TIMESTAMP(0) NOT NULL WITH DEFAULT CURRENT TIMESTAMP,
    PHOTO       BLOB(2M),
    DEPT_ID     SMALLINT,
    PRIMARY KEY (EMP_ID),
    CONSTRAINT FK_DEPT FOREIGN KEY (DEPT_ID) REFERENCES PAYROLL.DEPT (DEPT_ID)
) IN PAYDB.PAYTS
  PARTITION BY RANGE (HIRED);

CREATE GLOBAL TEMPORARY TABLE PAYROLL.WORK (ID INTEGER)@
"#;
    let result = Db2IceConverter::new(ConversionConfig::default().with_external_volume("PAY_VOL")).convert(ddl);
    assert!(result.success);
    assert_eq!(result.tables_converted, 2);

    let ddl = &result.iceberg_ddl;
    assert!(ddl.contains("CREATE OR REPLACE ICEBERG TABLE PAYROLL.EMPLOYEE ("));
    assert!(ddl.contains("    \"Order\" VARCHAR(2),"));
    assert!(ddl.contains("    HIRED TIMESTAMP_NTZ(6) NOT NULL,"));
    assert!(ddl.contains("GENERATED ALWAYS not supported in Iceberg"));
    assert!(ddl.contains("EXTERNAL_VOLUME = 'PAY_VOL'"));
    assert!(ddl.contains("BASE_LOCATION = 'payroll/employee'"));
    assert!(ddl.contains("-- Original partitioning: PARTITION BY RANGE (HIRED)"));
    assert!(ddl.contains("-- Original tablespace: PAYDB.PAYTS"));
    assert!(ddl.contains("CREATE OR REPLACE TEMPORARY TABLE PAYROLL.WORK ("));

    let assessment = &result.assessment;
    assert_eq!(assessment.tables_total, 2);
    assert!(assessment
        .warnings
        .iter()
        .any(|i| i.code == codes::db2::GENERATED_COLUMN && i.column.as_deref() == Some("EMP_ID")));
    assert!(assessment
        .info_items
        .iter()
        .any(|i| i.code == codes::db2::FOREIGN_KEY && i.severity == IssueSeverity::Info));
}

// ============================================================================
// Snowflake
// ============================================================================

#[test]
fn test_dynamic_table_is_skipped_but_batch_succeeds() {
    let ddl = "CREATE OR REPLACE DYNAMIC TABLE ANALYTICS.DAILY (D DATE, N NUMBER) \
               TARGET_LAG = '1 hour' WAREHOUSE = WH AS SELECT D, COUNT(*) FROM RAW GROUP BY D; \
               CREATE TABLE ANALYTICS.RAW (D DATE, PAYLOAD VARCHAR);";
    let result = SnowflakeToIcebergConverter::new(ConversionConfig::default()).convert(ddl);

    assert!(result.success);
    assert_eq!(result.tables_converted, 2);

    let dynamic_part = result.iceberg_ddl.split("\n\n").next().unwrap_or_default();
    assert!(dynamic_part.contains("DYNAMIC TABLE SKIPPED"));
    assert!(!dynamic_part.contains("CREATE"));

    let skipped: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.code == codes::snowflake::DYNAMIC_SKIPPED)
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].severity, IssueSeverity::Critical);
    assert_eq!(result.ewi_count, 1);
    assert!(result.iceberg_ddl.contains("CREATE OR REPLACE ICEBERG TABLE ANALYTICS.RAW ("));
}
