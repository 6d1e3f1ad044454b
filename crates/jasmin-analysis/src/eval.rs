//! Constant-expression evaluation.
//!
//! Evaluates integer constant expressions over CST nodes against a
//! `name → value` environment, and runs an iterative fixpoint over all
//! top-level `param` declarations in a request's source map so constants
//! may refer to constants from other files in any order.

use crate::source_map::SourceMap;
use jasmin_cst::Node;
use rustc_hash::FxHashMap;

/// Why a constant expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("invalid integer literal `{0}`")]
    InvalidLiteral(String),
    #[error("unsupported constant expression ({0})")]
    Unsupported(&'static str),
}

/// Evaluate a constant expression node.
///
/// Arithmetic is two's-complement at host integer width; `!x` yields 0/1.
pub fn eval_expr(
    node: Node<'_>,
    source: &str,
    env: &FxHashMap<String, i64>,
) -> Result<i64, EvalError> {
    match node.kind() {
        "int_literal" => parse_int(node.text(source)),
        "identifier" => {
            let name = node.text(source);
            env.get(name).copied().ok_or_else(|| EvalError::UnknownIdentifier(name.to_string()))
        }
        "binary_expression" => {
            let left = field(node, "left")?;
            let op = field(node, "operator")?;
            let right = field(node, "right")?;
            let l = eval_expr(left, source, env)?;
            let r = eval_expr(right, source, env)?;
            apply_binary(op.text(source), l, r)
        }
        "unary_expression" => {
            let op = field(node, "operator")?;
            let arg = field(node, "argument")?;
            let v = eval_expr(arg, source, env)?;
            match op.text(source) {
                "-" => Ok(v.wrapping_neg()),
                "+" => Ok(v),
                "~" => Ok(!v),
                "!" => Ok(i64::from(v == 0)),
                _ => Err(EvalError::Unsupported("unary operator")),
            }
        }
        "parenthesized_expression" => {
            let inner = node
                .named_children()
                .next()
                .ok_or(EvalError::Unsupported("empty parentheses"))?;
            eval_expr(inner, source, env)
        }
        "cast_expression" => {
            let value = field(node, "value")?;
            eval_expr(value, source, env)
        }
        _ => Err(EvalError::Unsupported("expression form")),
    }
}

fn field<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>, EvalError> {
    node.child_by_field_name(name).ok_or(EvalError::Unsupported("malformed expression node"))
}

fn apply_binary(op: &str, l: i64, r: i64) -> Result<i64, EvalError> {
    match op {
        "+" => Ok(l.wrapping_add(r)),
        "-" => Ok(l.wrapping_sub(r)),
        "*" => Ok(l.wrapping_mul(r)),
        "/" => {
            if r == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(l.wrapping_div(r))
            }
        }
        "%" => {
            if r == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(l.wrapping_rem(r))
            }
        }
        "<<" => Ok(l.wrapping_shl((r & 63) as u32)),
        ">>" => Ok(l.wrapping_shr((r & 63) as u32)),
        "&" => Ok(l & r),
        "|" => Ok(l | r),
        "^" => Ok(l ^ r),
        _ => Err(EvalError::Unsupported("binary operator")),
    }
}

fn parse_int(text: &str) -> Result<i64, EvalError> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let parsed = if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).map(|v| v as i64)
    } else if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).map(|v| v as i64)
    } else {
        cleaned.parse::<i64>().or_else(|_| cleaned.parse::<u64>().map(|v| v as i64))
    };
    parsed.map_err(|_| EvalError::InvalidLiteral(text.to_string()))
}

/// Fixpoint over every top-level `param NAME = EXPR` in the source map.
///
/// Runs up to 10 passes; each pass evaluates the still-pending constants
/// against the environment accumulated so far and stops as soon as a pass
/// solves nothing new. The result is independent of file and declaration
/// order for any dependency chain that resolves within ten passes.
pub fn evaluate_constants(map: &SourceMap) -> FxHashMap<String, i64> {
    let mut pending: Vec<(String, Node<'_>, &str)> = Vec::new();
    for entry in map.files.values() {
        let Some(tree) = &entry.tree else { continue };
        for item in tree.root_node().named_children() {
            if item.kind() != "param" {
                continue;
            }
            let Some(name_node) = item.child_by_field_name("name") else { continue };
            let Some(value_node) = item.child_by_field_name("value") else { continue };
            let name = name_node.text(&entry.text);
            if !name.is_empty() {
                pending.push((name.to_string(), value_node, entry.text.as_str()));
            }
        }
    }

    let mut env: FxHashMap<String, i64> = FxHashMap::default();
    for _pass in 0..10 {
        let mut solved: Vec<(usize, i64)> = Vec::new();
        for (i, (_, node, source)) in pending.iter().enumerate() {
            if let Ok(value) = eval_expr(*node, source, &env) {
                solved.push((i, value));
            }
        }
        if solved.is_empty() {
            break;
        }
        for (i, value) in solved.into_iter().rev() {
            let (name, _, _) = pending.swap_remove(i);
            env.insert(name, value);
        }
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_map::SourceEntry;
    use jasmin_cst::Parser;
    use pretty_assertions::assert_eq;

    fn eval_str(expr: &str, env: &FxHashMap<String, i64>) -> Result<i64, EvalError> {
        let source = format!("param int X = {expr};");
        let mut parser = Parser::new();
        let tree = parser.parse(&source).unwrap();
        let param = tree.root_node().named_child(0).unwrap();
        let value = param.child_by_field_name("value").unwrap();
        eval_expr(value, &source, env)
    }

    fn map_of(files: &[&str]) -> SourceMap {
        let mut parser = Parser::new();
        let mut map = SourceMap::default();
        for (i, body) in files.iter().enumerate() {
            let tree = parser.parse(body);
            map.files.insert(
                format!("file:///c{i}.jinc"),
                SourceEntry { text: body.to_string(), tree },
            );
        }
        map
    }

    #[test]
    fn test_literals() {
        let env = FxHashMap::default();
        assert_eq!(eval_str("42", &env), Ok(42));
        assert_eq!(eval_str("0x10", &env), Ok(16));
        assert_eq!(eval_str("0b101", &env), Ok(5));
        assert_eq!(eval_str("1_024", &env), Ok(1024));
    }

    #[test]
    fn test_operators() {
        let env = FxHashMap::default();
        assert_eq!(eval_str("10 + 5", &env), Ok(15));
        assert_eq!(eval_str("2 * 3 + 4", &env), Ok(10));
        assert_eq!(eval_str("1 << 6", &env), Ok(64));
        assert_eq!(eval_str("0xFF & 0x0F", &env), Ok(0x0F));
        assert_eq!(eval_str("7 % 4", &env), Ok(3));
        assert_eq!(eval_str("-(3)", &env), Ok(-3));
        assert_eq!(eval_str("~0", &env), Ok(-1));
        assert_eq!(eval_str("!0", &env), Ok(1));
        assert_eq!(eval_str("!7", &env), Ok(0));
        assert_eq!(eval_str("(u64)8", &env), Ok(8));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let env = FxHashMap::default();
        assert_eq!(eval_str("1 / 0", &env), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("1 % 0", &env), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_identifier_lookup() {
        let mut env = FxHashMap::default();
        env.insert("N".to_string(), 8i64);
        assert_eq!(eval_str("N * 2", &env), Ok(16));
        assert!(matches!(eval_str("M", &env), Err(EvalError::UnknownIdentifier(_))));
    }

    #[test]
    fn test_fixpoint_resolves_chain() {
        let map = map_of(&["param int A = B + 1;\nparam int B = C * 2;", "param int C = 10;"]);
        let env = evaluate_constants(&map);
        assert_eq!(env.get("C"), Some(&10));
        assert_eq!(env.get("B"), Some(&20));
        assert_eq!(env.get("A"), Some(&21));
    }

    #[test]
    fn test_fixpoint_is_order_independent() {
        let files = ["param int A = B + 1;", "param int B = C * 2;", "param int C = 10;"];
        let forward = evaluate_constants(&map_of(&files));
        let reversed: Vec<&str> = files.iter().rev().copied().collect();
        let backward = evaluate_constants(&map_of(&reversed));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_unsolvable_constants_stay_out() {
        let map = map_of(&["param int A = MISSING + 1;\nparam int B = 2;"]);
        let env = evaluate_constants(&map);
        assert_eq!(env.get("B"), Some(&2));
        assert_eq!(env.get("A"), None);
    }

    #[test]
    fn test_cyclic_constants_terminate() {
        let map = map_of(&["param int A = B;\nparam int B = A;"]);
        let env = evaluate_constants(&map);
        assert!(env.is_empty());
    }
}
