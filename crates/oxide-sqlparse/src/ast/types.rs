//! Column types of `CREATE TABLE` and `::` casts.

use core::fmt;

use super::Expr;

/// Column policy of an `OBJECT` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectPolicy {
    /// New keys are added to the schema.
    Dynamic,
    /// Unknown keys are rejected.
    Strict,
    /// Unknown keys are stored but not indexed.
    Ignored,
}

impl ObjectPolicy {
    /// Returns the keyword as written in SQL.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dynamic => "DYNAMIC",
            Self::Strict => "STRICT",
            Self::Ignored => "IGNORED",
        }
    }
}

/// A column or cast type.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Smallint,
    Integer,
    Bigint,
    Real,
    /// `DOUBLE [PRECISION]` and `FLOAT`.
    Double,
    Decimal {
        precision: Option<u16>,
        scale: Option<u16>,
    },
    Numeric {
        precision: Option<u16>,
        scale: Option<u16>,
    },
    Char(Option<u32>),
    Varchar(Option<u32>),
    Text,
    Date,
    Time,
    Timestamp,
    Boolean,
    /// `OBJECT [(policy)] [AS (columns)]`.
    Object {
        policy: Option<ObjectPolicy>,
        columns: Vec<ColumnDef>,
    },
    /// `ARRAY(inner)`.
    Array(Box<DataType>),
    /// Any other type name, kept as written (`STRING`, `GEO_POINT`, ...).
    Custom(String),
}

/// Writes `(p)` or `(p, s)` after a type name.
fn write_modifiers(
    f: &mut fmt::Formatter<'_>,
    first: Option<impl fmt::Display>,
    second: Option<u16>,
) -> fmt::Result {
    match (first, second) {
        (Some(first), Some(second)) => write!(f, "({first}, {second})"),
        (Some(first), None) => write!(f, "({first})"),
        _ => Ok(()),
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smallint => f.write_str("SMALLINT"),
            Self::Integer => f.write_str("INTEGER"),
            Self::Bigint => f.write_str("BIGINT"),
            Self::Real => f.write_str("REAL"),
            Self::Double => f.write_str("DOUBLE PRECISION"),
            Self::Decimal { precision, scale } => {
                f.write_str("DECIMAL")?;
                write_modifiers(f, *precision, *scale)
            }
            Self::Numeric { precision, scale } => {
                f.write_str("NUMERIC")?;
                write_modifiers(f, *precision, *scale)
            }
            Self::Char(len) => {
                f.write_str("CHAR")?;
                write_modifiers(f, *len, None)
            }
            Self::Varchar(len) => {
                f.write_str("VARCHAR")?;
                write_modifiers(f, *len, None)
            }
            Self::Text => f.write_str("TEXT"),
            Self::Date => f.write_str("DATE"),
            Self::Time => f.write_str("TIME"),
            Self::Timestamp => f.write_str("TIMESTAMP"),
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Object { policy, columns } => {
                f.write_str("OBJECT")?;
                if let Some(policy) = policy {
                    write!(f, " ({})", policy.as_str())?;
                }
                if !columns.is_empty() {
                    f.write_str(" AS (")?;
                    for (i, column) in columns.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "\"{}\" {}", column.name, column.data_type)?;
                    }
                    f.write_str(")")?;
                }
                Ok(())
            }
            Self::Array(inner) => write!(f, "ARRAY({inner})"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// One column of `CREATE TABLE` or of an `OBJECT AS (...)` type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    /// False after `NOT NULL` or `PRIMARY KEY`.
    pub nullable: bool,
    pub default: Option<Expr>,
    pub primary_key: bool,
    /// `GENERATED ALWAYS AS expr` or `AS expr`.
    pub generated: Option<Expr>,
}

impl ColumnDef {
    /// A nullable column without constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            primary_key: false,
            generated: None,
        }
    }

    /// Marks the column as the primary key, which also makes it NOT NULL.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers() {
        assert_eq!(DataType::Integer.to_string(), "INTEGER");
        assert_eq!(DataType::Varchar(Some(255)).to_string(), "VARCHAR(255)");
        assert_eq!(DataType::Char(None).to_string(), "CHAR");
        let decimal = DataType::Decimal {
            precision: Some(10),
            scale: Some(2),
        };
        assert_eq!(decimal.to_string(), "DECIMAL(10, 2)");
        let numeric = DataType::Numeric {
            precision: Some(4),
            scale: None,
        };
        assert_eq!(numeric.to_string(), "NUMERIC(4)");
    }

    #[test]
    fn test_container_types() {
        let object = DataType::Object {
            policy: Some(ObjectPolicy::Dynamic),
            columns: vec![
                ColumnDef::new("z", DataType::Text),
                ColumnDef::new("tags", DataType::Array(Box::new(DataType::Text))),
            ],
        };
        assert_eq!(
            object.to_string(),
            "OBJECT (DYNAMIC) AS (\"z\" TEXT, \"tags\" ARRAY(TEXT))"
        );
        assert_eq!(
            DataType::Array(Box::new(DataType::Bigint)).to_string(),
            "ARRAY(BIGINT)"
        );
        assert_eq!(DataType::Custom(String::from("GEO_POINT")).to_string(), "GEO_POINT");
    }

    #[test]
    fn test_primary_key_is_not_null() {
        let column = ColumnDef::new("id", DataType::Integer).primary_key();
        assert!(column.primary_key);
        assert!(!column.nullable);
        assert!(ColumnDef::new("x", DataType::Text).nullable);
    }
}
