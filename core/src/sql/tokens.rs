/// SQL keywords, operators and punctuation.
///
/// Dialect-specific spellings (bitwise operators, paging keywords that differ
/// per database, random functions) are not tokens. They come from the
/// [`Dialect`](ormlite_types::Dialect) descriptor and are emitted as raw chunks.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Statements and clauses
    SELECT,
    DISTINCT,
    FROM,
    WHERE,
    GROUP,
    HAVING,
    ORDER,
    BY,
    ASC,
    DESC,
    LIMIT,
    OFFSET,
    ROWS,
    FETCH,
    NEXT,
    ONLY,

    // Joins
    JOIN,
    INNER,
    LEFT,
    RIGHT,
    FULL,
    CROSS,
    ON,
    AS,

    // Predicates
    AND,
    OR,
    NOT,
    IN,
    IS,
    NULL,
    LIKE,
    ESCAPE,
    EXISTS,

    // Expressions
    CASE,
    WHEN,
    THEN,
    ELSE,
    END,
    CAST,
    FOR,

    // Operators
    EQ,
    NE,
    LT,
    LE,
    GT,
    GE,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,

    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    DOT,
    SEMI,
}

impl Token {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::DISTINCT => "DISTINCT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::GROUP => "GROUP",
            Token::HAVING => "HAVING",
            Token::ORDER => "ORDER",
            Token::BY => "BY",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::ROWS => "ROWS",
            Token::FETCH => "FETCH",
            Token::NEXT => "NEXT",
            Token::ONLY => "ONLY",
            Token::JOIN => "JOIN",
            Token::INNER => "INNER",
            Token::LEFT => "LEFT",
            Token::RIGHT => "RIGHT",
            Token::FULL => "FULL",
            Token::CROSS => "CROSS",
            Token::ON => "ON",
            Token::AS => "AS",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::IN => "IN",
            Token::IS => "IS",
            Token::NULL => "NULL",
            Token::LIKE => "LIKE",
            Token::ESCAPE => "ESCAPE",
            Token::EXISTS => "EXISTS",
            Token::CASE => "CASE",
            Token::WHEN => "WHEN",
            Token::THEN => "THEN",
            Token::ELSE => "ELSE",
            Token::END => "END",
            Token::CAST => "CAST",
            Token::FOR => "FOR",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::LT => "<",
            Token::LE => "<=",
            Token::GT => ">",
            Token::GE => ">=",
            Token::PLUS => "+",
            Token::MINUS => "-",
            Token::STAR => "*",
            Token::SLASH => "/",
            Token::PERCENT => "%",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::DOT => ".",
            Token::SEMI => ";",
        }
    }

    /// Comparison and arithmetic operators, spaced on both sides.
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ
                | Token::NE
                | Token::LT
                | Token::LE
                | Token::GT
                | Token::GE
                | Token::PLUS
                | Token::MINUS
                | Token::STAR
                | Token::SLASH
                | Token::PERCENT
        )
    }

    /// Punctuation never counts as a word for spacing purposes.
    pub const fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Token::LPAREN | Token::RPAREN | Token::COMMA | Token::SEMI | Token::DOT
        )
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
