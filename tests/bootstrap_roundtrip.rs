//! The self-describing grammar against real descriptions

use metagram::{bootstrap, compile, parse, ParseError, StructuralError, BOOTSTRAP_GRAMMAR};
use rstest::rstest;

const START: &str = "grammar";

const EXPRESSIONS: &str = r#"
// Arithmetic with left recursive operators
skip ` |\t|\n`
token NUM `{0-9}+`
token ID `{a-zA-Z_}{a-zA-Z0-9_}*`

expr ::= expr "+" term | expr "-" term | term
term ::= term "*" atom | atom
atom ::= NUM | ID | "(" expr ")"
"#;

const BLOCKS: &str = r#"
skip ` +`
token word `{a-z}+`
token text `(~\n)+`
block ::= (
    "begin" word
  | "begin"
) [~"end"*] "end"
"#;

fn statement_count(description: &str) -> usize {
    let grammar = bootstrap().unwrap();
    let outcome = parse(grammar, START, description).unwrap();
    assert!(outcome.accepted, "bootstrap rejected {description:?}");
    outcome.tree.map_or(0, |tree| tree.children_named("statement").count())
}

#[test]
fn test_bootstrap_reads_its_own_text() {
    let grammar = bootstrap().unwrap();
    let outcome = parse(grammar, START, BOOTSTRAP_GRAMMAR).unwrap();
    assert!(outcome.accepted);

    let tree = outcome.tree.unwrap();
    let rules: Vec<_> = tree
        .children_named("statement")
        .filter_map(|statement| statement.find("production_rule"))
        .filter_map(|rule| rule.capture(1))
        .collect();
    assert_eq!(rules.first(), Some(&"grammar"));
    assert!(rules.contains(&"nested_sequence"));
    assert_eq!(rules.len(), bootstrap().unwrap().productions().len());
}

#[rstest]
#[case(EXPRESSIONS, 6)]
#[case(BLOCKS, 4)]
#[case("", 0)]
#[case("p ::= \"x\"*", 1)]
#[case("r ::= r \"x\" | \"x\"\r\nq ::= [r] ~r+", 2)]
fn test_bootstrap_agrees_with_compiler(#[case] description: &str, #[case] statements: usize) {
    assert!(compile(description).is_ok());
    assert_eq!(statement_count(description), statements);
}

#[rstest]
#[case("p \"x\"")]
#[case("p ::= (\"x\"")]
#[case("p ::= \"x\" )")]
#[case("p ::= a |\n")]
fn test_bootstrap_rejects_malformed_descriptions(#[case] description: &str) {
    assert!(compile(description).is_err());
    let outcome = parse(bootstrap().unwrap(), START, description).unwrap();
    assert!(!outcome.accepted);
}

#[test]
fn test_bootstrap_does_not_resolve_names() {
    let description = "p ::= q\np ::= \"x\"";
    assert!(compile(description).is_err());
    assert_eq!(statement_count(description), 2);
}

#[test]
fn test_bootstrap_scan_error() {
    let err = parse(bootstrap().unwrap(), START, "p ::= $").unwrap_err();
    assert!(matches!(err, ParseError::Scan(ref scan) if scan.offset == 6), "{err:?}");
}

fn variant(err: &StructuralError) -> &'static str {
    match err {
        StructuralError::UnexpectedCharacter { .. } => "UnexpectedCharacter",
        StructuralError::UnbalancedGroup { .. } => "UnbalancedGroup",
        StructuralError::UnclosedGroup { .. } => "UnclosedGroup",
        StructuralError::MalformedStatement { .. } => "MalformedStatement",
        StructuralError::InvalidPattern { .. } => "InvalidPattern",
        StructuralError::DuplicateDefinition { .. } => "DuplicateDefinition",
        StructuralError::UndefinedReference { .. } => "UndefinedReference",
        StructuralError::RecursiveTerminal { .. } => "RecursiveTerminal",
        StructuralError::ProductionInTerminal { .. } => "ProductionInTerminal",
    }
}

#[rstest]
#[case("p ::= $", "UnexpectedCharacter", (0, 6))]
#[case("p ::= \"x\" )", "UnbalancedGroup", (0, 10))]
#[case("p ::= \"x\"\nq ::= [\"y\"", "UnclosedGroup", (1, 6))]
#[case("p \"x\"", "MalformedStatement", (0, 2))]
#[case("token t `a\\q`", "InvalidPattern", (0, 10))]
#[case("p ::= \"\"", "InvalidPattern", (0, 6))]
#[case("p ::= \"x\"\np ::= \"y\"", "DuplicateDefinition", (1, 0))]
#[case("p ::= \"x\" q", "UndefinedReference", (0, 0))]
#[case("token a b\ntoken b \"x\" a", "RecursiveTerminal", (0, 0))]
#[case("p ::= \"x\"\ntoken t p", "ProductionInTerminal", (1, 0))]
fn test_structural_errors(
    #[case] description: &str,
    #[case] expected: &str,
    #[case] position: (usize, usize),
) {
    let err = compile(description).unwrap_err();
    assert_eq!(variant(&err), expected, "{err}");
    assert_eq!((err.position().line, err.position().column), position);
}
