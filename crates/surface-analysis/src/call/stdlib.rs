//! Process-wide standard library tables, parsed once from the packaged lists.

use std::sync::OnceLock;

use surface_core::types::collections::FxHashSet;

use super::Call;

static C_INPUT: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
static C_OUTPUT: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
static C_DANGEROUS: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
static C_STD_LIB: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
static ANDROID_INPUT: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
static ANDROID_OUTPUT: OnceLock<FxHashSet<&'static str>> = OnceLock::new();

/// Package prefixes of the Android framework and the Java runtime.
const ANDROID_FRAMEWORK_PREFIXES: &[&str] = &[
    "android.",
    "com.android.",
    "com.google.android.",
    "dalvik.",
    "java.",
    "javax.",
];

fn parse_list(text: &'static str) -> FxHashSet<&'static str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

pub fn c_input() -> &'static FxHashSet<&'static str> {
    C_INPUT.get_or_init(|| parse_list(include_str!("data/c_input_functions.txt")))
}

pub fn c_output() -> &'static FxHashSet<&'static str> {
    C_OUTPUT.get_or_init(|| parse_list(include_str!("data/c_output_functions.txt")))
}

pub fn c_dangerous() -> &'static FxHashSet<&'static str> {
    C_DANGEROUS.get_or_init(|| parse_list(include_str!("data/c_dangerous_sys_calls.txt")))
}

pub fn c_std_lib() -> &'static FxHashSet<&'static str> {
    C_STD_LIB.get_or_init(|| parse_list(include_str!("data/c_std_lib_functions.txt")))
}

pub fn android_input() -> &'static FxHashSet<&'static str> {
    ANDROID_INPUT.get_or_init(|| parse_list(include_str!("data/android_input_methods.txt")))
}

pub fn android_output() -> &'static FxHashSet<&'static str> {
    ANDROID_OUTPUT.get_or_init(|| parse_list(include_str!("data/android_output_methods.txt")))
}

/// True when `signature` names a class of the Android framework or Java runtime.
pub fn is_android_framework(signature: &str) -> bool {
    ANDROID_FRAMEWORK_PREFIXES
        .iter()
        .any(|prefix| signature.starts_with(prefix))
}

/// Android lists hold either a bare method (`onCreate`) or a
/// `Class.method` pair (`ContentResolver.query`); the class may be simple
/// or fully qualified.
pub(crate) fn android_matches(table: &FxHashSet<&'static str>, call: &Call) -> bool {
    if table.contains(call.name()) {
        return true;
    }
    let signature = call.signature();
    let simple_class = signature.rsplit('.').next().unwrap_or(signature);
    table.contains(format!("{simple_class}.{}", call.name()).as_str())
        || table.contains(format!("{signature}.{}", call.name()).as_str())
}
