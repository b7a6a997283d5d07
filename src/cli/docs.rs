//! Documentation content for kql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Escapes,
    Wildcards,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" | "keywords" => Some(Self::Operators),
            "escapes" | "escape" | "escaping" => Some(Self::Escapes),
            "wildcards" | "wildcard" | "glob" => Some(Self::Wildcards),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"KQL DOCUMENTATION

KQL is a small filter language: field comparisons joined with AND / OR,
optionally negated with NOT and grouped with parentheses.

DOCUMENTATION CATEGORIES

  syntax            Terms, fields, values, grouping and chaining
  operators         Comparison operators and boolean keywords
  escapes           Backslash escapes in bare words and quoted strings
  wildcards         The * wildcard and where it is recognised

QUICK REFERENCE

  status: active              Field equals value
  age >= 18                   Range comparison (numeric value)
  NOT deleted: true           Negation
  a: 1 AND (b: 2 OR c: 3)     Chaining and grouping
  name: "Jane Doe"            Quoted value
  path: /usr/*                Wildcard

Run 'kql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Escapes) => Ok(ESCAPES_DOC),
        Some(DocCategory::Wildcards) => Ok(WILDCARDS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Terms and Chains

TERMS
  <value>
    A bare value matches across all fields.

    Example:
      error

  <field> <operator> <value>
    A field comparison. The field must be a bare word.

    Example:
      status: active
      age >= 18

    Constraints:
      - Numbers and quoted strings cannot be fields: `123 > 1` fails
      - Whitespace around the operator is optional: `age>=18`

VALUES
  Integer     42, -7, +3
  Float       3.14, -0.5
  String      "Jane Doe"   (may contain spaces and special characters)
  Word        active, /var/log, user@example.com

NEGATION
  NOT <term>
    Negates a single term.

    Example:
      NOT status: archived

GROUPING
  ( <query> )
    Groups a sub-query. May stand as a value of a field.

    Example:
      (a: 1 OR b: 2) AND c: 3
      status: (active OR pending)

    Terms inside `field: (...)` that have no field of their own
    are compared against the enclosing field.

CHAINING
  <term> AND <term> OR <term> ...
    AND and OR have equal precedence. A chain nests to the right:

      a AND b OR c   reads as   a AND (b OR c)

    Use parentheses to group differently.

CANONICAL FORM
  `kql fmt` prints a query with single spaces between tokens,
  no space before `:` and one space around other operators:

      status:active  AND age>=18
      => status: active AND age >= 18
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparisons and Keywords

COMPARISON OPERATORS
  :     Equal / matches
  <     Less than
  >     Greater than
  <=    Less than or equal
  >=    Greater than or equal

  Examples:
    status: active
    price < 100
    rating >= 4.5

  Constraints:
    - <, >, <= and >= require a numeric value; `age >= abc` fails
    - Wildcards are allowed in range values: `age >= 1*`

BOOLEAN KEYWORDS
  AND   Both sides must match
  OR    Either side must match
  NOT   Negates the following term

  Keywords are case-insensitive: and, Or, NOT.

  Constraints:
    - A keyword cannot stand alone: `AND` fails
    - Directly after an operator a word is always a value:
      `status: and` compares against "and"
"#;

const ESCAPES_DOC: &str = r#"ESCAPES - Backslash Escapes

BARE WORDS
  A backslash makes the next character literal. It may precede:

    \*        a literal star (not a wildcard)
    \:  \<  \>  \(  \)
              special characters that would end the word
    \"  \\    quote and backslash
    \AND  \or  \>=
              a keyword or operator spelled as a plain value

  Examples:
    title: \AND
    path: C\:\\temp
    note: a\*

  Any other escape is an error: `a\b` fails with "unexpected escapes".

QUOTED STRINGS
  Inside double quotes only three escapes are recognised:

    \"   \\   \*

  Special characters need no escape inside quotes:

    msg: "a: (b)"

  Constraints:
    - An unknown escape such as "\n" fails
    - A missing closing quote fails with "expected double quote closed"
"#;

const WILDCARDS_DOC: &str = r#"WILDCARDS - The * Character

PATTERNS
  An unescaped * in a word or a quoted string makes the value a wildcard.

  Examples:
    name: Jo*
    path: "/var/log/*.log"
    host: *.example.com

NUMBERS
  A * directly after digits turns the number into a wildcard word:

    code: 40*      wildcard
    code: 2*0      wildcard
    code: 5.*      wildcard

ESCAPED STARS
  \* is a literal star and never a wildcard:

    note: a\*            literal "a*"
    q: "a\*b"            literal "a*b"

OFFSETS
  `kql ast` reports `wildcard_offsets`: the char index of each wildcard
  in the rendered value, counting the opening quote of strings.

    f: *0        => [0]
    f: 2*0       => [1]
    f: "a*"      => [2]
"#;
