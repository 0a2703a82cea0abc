//! Token types for the SQL lexer.

use super::Span;

/// Declares [`Keyword`] with its spelling table and reserved split.
macro_rules! keywords {
    (
        reserved { $($reserved:ident = $reserved_text:literal,)* }
        non_reserved { $($other:ident = $other_text:literal,)* }
    ) => {
        /// SQL keywords.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($reserved,)*
            $($other,)*
        }

        impl Keyword {
            /// Every keyword, reserved ones first.
            pub const ALL: &'static [Self] = &[$(Self::$reserved,)* $(Self::$other,)*];

            /// Looks up a word, ignoring case.
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(word: &str) -> Option<Self> {
                match word.to_ascii_uppercase().as_str() {
                    $($reserved_text => Some(Self::$reserved),)*
                    $($other_text => Some(Self::$other),)*
                    _ => None,
                }
            }

            /// Returns the upper-case spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$reserved => $reserved_text,)*
                    $(Self::$other => $other_text,)*
                }
            }

            /// Returns true if the keyword can never be used as an identifier.
            ///
            /// Non-reserved keywords (type names, ordering modifiers, session
            /// vocabulary) are accepted wherever an identifier is expected.
            #[must_use]
            pub const fn is_reserved(&self) -> bool {
                matches!(self, $(Self::$reserved)|*)
            }
        }
    };
}

keywords! {
    reserved {
        // Queries
        Select = "SELECT",
        From = "FROM",
        Where = "WHERE",
        Order = "ORDER",
        By = "BY",
        Group = "GROUP",
        Having = "HAVING",
        Limit = "LIMIT",
        Offset = "OFFSET",
        Distinct = "DISTINCT",
        All = "ALL",
        With = "WITH",
        Join = "JOIN",
        Inner = "INNER",
        Left = "LEFT",
        Right = "RIGHT",
        Full = "FULL",
        Outer = "OUTER",
        Cross = "CROSS",
        On = "ON",
        Using = "USING",
        Union = "UNION",
        Intersect = "INTERSECT",
        Except = "EXCEPT",
        As = "AS",
        Case = "CASE",
        When = "WHEN",
        Then = "THEN",
        Else = "ELSE",
        End = "END",
        Cast = "CAST",

        // Statement starts
        Insert = "INSERT",
        Into = "INTO",
        Values = "VALUES",
        Update = "UPDATE",
        Set = "SET",
        Delete = "DELETE",
        Copy = "COPY",
        Create = "CREATE",
        Drop = "DROP",
        Alter = "ALTER",
        Table = "TABLE",
        Default = "DEFAULT",
        Analyze = "ANALYZE",
        Close = "CLOSE",
        Deallocate = "DEALLOCATE",
        Declare = "DECLARE",
        Discard = "DISCARD",
        Explain = "EXPLAIN",
        Fetch = "FETCH",
        Kill = "KILL",
        Optimize = "OPTIMIZE",
        Refresh = "REFRESH",
        Reset = "RESET",
        Restore = "RESTORE",
        Show = "SHOW",
        Grant = "GRANT",
        Deny = "DENY",
        Revoke = "REVOKE",
        Begin = "BEGIN",
        Start = "START",
        Commit = "COMMIT",

        // Predicates and literals
        And = "AND",
        Or = "OR",
        Not = "NOT",
        In = "IN",
        Between = "BETWEEN",
        Like = "LIKE",
        Is = "IS",
        Null = "NULL",
        True = "TRUE",
        False = "FALSE",
        Exists = "EXISTS",
    }
    non_reserved {
        Primary = "PRIMARY",
        Key = "KEY",
        Generated = "GENERATED",
        Always = "ALWAYS",
        If = "IF",
        Session = "SESSION",
        Local = "LOCAL",
        To = "TO",
        Tables = "TABLES",
        Schemas = "SCHEMAS",
        Prepare = "PREPARE",
        Plans = "PLANS",
        Sequences = "SEQUENCES",
        Temp = "TEMP",
        Temporary = "TEMPORARY",
        Transaction = "TRANSACTION",
        Work = "WORK",
        Asc = "ASC",
        Desc = "DESC",
        Nulls = "NULLS",
        First = "FIRST",
        Last = "LAST",

        // Types
        Int = "INT",
        Integer = "INTEGER",
        Smallint = "SMALLINT",
        Bigint = "BIGINT",
        Real = "REAL",
        Double = "DOUBLE",
        Precision = "PRECISION",
        Float = "FLOAT",
        Decimal = "DECIMAL",
        Numeric = "NUMERIC",
        Char = "CHAR",
        Varchar = "VARCHAR",
        Text = "TEXT",
        Boolean = "BOOLEAN",
        Date = "DATE",
        Time = "TIME",
        Timestamp = "TIMESTAMP",
        Object = "OBJECT",
        Array = "ARRAY",
        Dynamic = "DYNAMIC",
        Strict = "STRICT",
        Ignored = "IGNORED",
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Float literal (e.g., 3.14)
    Float(f64),
    /// Integer literal too large for `i64`, as written
    Numeric(String),
    /// String literal (e.g., 'hello')
    String(String),
    /// Blob literal (e.g., X'1234')
    Blob(Vec<u8>),

    // Identifiers and keywords
    /// Identifier (e.g., column_name)
    Identifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,
    /// ?
    Question,
    /// $1, $2, ...
    Parameter(u32),
    /// @
    At,

    // Special
    /// End of input
    Eof,
    /// Input the lexer could not turn into a token.
    Error(String),
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the source text of the token, or `<EOF>` for the end of input.
    #[must_use]
    pub fn display_text<'s>(&self, source: &'s str) -> &'s str {
        if self.is_eof() {
            "<EOF>"
        } else {
            self.span.slice(source)
        }
    }
}
