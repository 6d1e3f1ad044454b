//! Hover documentation for the closed set of Jasmin keywords.

use phf::phf_map;

/// Markdown blurbs keyed by keyword. The set is closed; identifiers not in
/// this table are resolved as symbols instead.
pub static KEYWORD_DOCS: phf::Map<&'static str, &'static str> = phf_map! {
    "fn" => "**fn**: declares a function.\n\n```jasmin\nfn name(params) -> return-types { ... }\n```",
    "inline" => "**inline**: marks a function or variable for unconditional inlining; inline values exist only at compile time.",
    "export" => "**export**: makes a function callable from outside the compilation unit using the platform calling convention.",
    "return" => "**return**: returns the listed values from the enclosing function.",
    "if" => "**if**: conditional execution.\n\n```jasmin\nif cond { ... } else { ... }\n```",
    "else" => "**else**: alternative branch of an `if` statement.",
    "while" => "**while**: loop executing while the condition holds.",
    "for" => "**for**: compile-time counted loop.\n\n```jasmin\nfor i = 0 to N { ... }\n```",
    "require" => "**require**: textually includes another source file.\n\n```jasmin\nrequire \"file.jinc\"\n```",
    "from" => "**from**: namespace qualifier for `require`.\n\n```jasmin\nfrom NS require \"file.jinc\"\n```",
    "param" => "**param**: compile-time integer constant.\n\n```jasmin\nparam int N = 4;\n```",
    "global" => "**global**: module-level value placed in the data section.",
    "reg" => "**reg**: storage class: the value lives in a machine register.",
    "stack" => "**stack**: storage class: the value lives in the stack frame.",
    "const" => "**const**: storage class: a compile-time constant value.",
    "int" => "**int**: unbounded compile-time integer type.",
    "u8" => "**u8**: 8-bit machine word.",
    "u16" => "**u16**: 16-bit machine word.",
    "u32" => "**u32**: 32-bit machine word.",
    "u64" => "**u64**: 64-bit machine word.",
    "u128" => "**u128**: 128-bit vector word.",
    "u256" => "**u256**: 256-bit vector word.",
};

/// Hover markdown for `word` if it is a reserved keyword.
pub fn keyword_hover(word: &str) -> Option<&'static str> {
    KEYWORD_DOCS.get(word).copied()
}
