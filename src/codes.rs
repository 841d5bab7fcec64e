//! Issue and EWI code vocabulary.
//!
//! Codes are part of the output contract: downstream tooling matches on
//! them, so existing numbers are never reused for a different meaning.

/// DB2 source codes (`SSC-EWI-DB2ICE-00NN`).
pub mod db2 {
    pub const NO_TABLES: &str = "SSC-EWI-DB2ICE-0000";
    pub const CHAR_TO_VARCHAR: &str = "SSC-EWI-DB2ICE-0001";
    pub const PRECISION_ADJUSTED: &str = "SSC-EWI-DB2ICE-0002";
    pub const TIME_PRECISION: &str = "SSC-EWI-DB2ICE-0003";
    pub const TIMESTAMP_PRECISION: &str = "SSC-EWI-DB2ICE-0004";
    pub const XML_UNSUPPORTED: &str = "SSC-EWI-DB2ICE-0005";
    pub const GRAPHIC_ENCODING: &str = "SSC-EWI-DB2ICE-0006";
    pub const DECFLOAT_PRECISION: &str = "SSC-EWI-DB2ICE-0007";
    pub const SIZE_LIMIT: &str = "SSC-EWI-DB2ICE-0008";
    pub const ROWID: &str = "SSC-EWI-DB2ICE-0009";
    pub const FOR_BIT_DATA: &str = "SSC-EWI-DB2ICE-0010";
    pub const FIELDPROC: &str = "SSC-EWI-DB2ICE-0011";
    pub const EDITPROC: &str = "SSC-EWI-DB2ICE-0012";
    pub const VALIDPROC: &str = "SSC-EWI-DB2ICE-0013";
    pub const GENERATED_COLUMN: &str = "SSC-EWI-DB2ICE-0014";
    pub const CHECK_CONSTRAINT: &str = "SSC-EWI-DB2ICE-0015";
    pub const FOREIGN_KEY: &str = "SSC-EWI-DB2ICE-0016";
    pub const PARTITIONING: &str = "SSC-EWI-DB2ICE-0017";
    pub const CCSID: &str = "SSC-EWI-DB2ICE-0018";
    pub const LONG_VARCHAR: &str = "SSC-EWI-DB2ICE-0019";
    pub const BLOB_TO_BINARY: &str = "SSC-EWI-DB2ICE-0020";
    pub const SESSION_TABLE_KEPT: &str = "SSC-EWI-DB2ICE-0030";
    pub const UNKNOWN_TYPE: &str = "SSC-EWI-DB2ICE-0099";
}

/// Snowflake source codes (`SSC-EWI-SF2ICE-00NN`).
pub mod snowflake {
    pub const NO_TABLES: &str = "SSC-EWI-SF2ICE-0000";
    pub const VARIANT: &str = "SSC-EWI-SF2ICE-0001";
    pub const OBJECT: &str = "SSC-EWI-SF2ICE-0002";
    pub const ARRAY: &str = "SSC-EWI-SF2ICE-0003";
    pub const GEOGRAPHY: &str = "SSC-EWI-SF2ICE-0004";
    pub const GEOMETRY: &str = "SSC-EWI-SF2ICE-0005";
    pub const TIME_PRECISION: &str = "SSC-EWI-SF2ICE-0006";
    pub const TIMESTAMP_NTZ_PRECISION: &str = "SSC-EWI-SF2ICE-0007";
    pub const TIMESTAMP_LTZ_PRECISION: &str = "SSC-EWI-SF2ICE-0008";
    pub const TIMESTAMP_TZ: &str = "SSC-EWI-SF2ICE-0009";
    pub const CLUSTER_BY: &str = "SSC-EWI-SF2ICE-0012";
    pub const DATA_RETENTION: &str = "SSC-EWI-SF2ICE-0013";
    pub const CHANGE_TRACKING: &str = "SSC-EWI-SF2ICE-0014";
    pub const IDENTITY: &str = "SSC-EWI-SF2ICE-0015";
    pub const MASKING_POLICY: &str = "SSC-EWI-SF2ICE-0016";
    pub const COLLATE: &str = "SSC-EWI-SF2ICE-0017";
    pub const TEMPORARY_KEPT: &str = "SSC-EWI-SF2ICE-0020";
    pub const TRANSIENT_KEPT: &str = "SSC-EWI-SF2ICE-0021";
    pub const DYNAMIC_SKIPPED: &str = "SSC-EWI-SF2ICE-0022";
    pub const EXTERNAL_SKIPPED: &str = "SSC-EWI-SF2ICE-0023";
    pub const HYBRID_SKIPPED: &str = "SSC-EWI-SF2ICE-0024";
}
