//! Call identity and classification.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use surface_core::errors::CallError;

use super::stdlib;
use super::Granularity;

/// Which classification tables apply to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    C,
    Android,
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Android => "android",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Environment {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Self::C),
            "android" => Ok(Self::Android),
            _ => Err(CallError::UnsupportedEnvironment {
                value: s.to_string(),
            }),
        }
    }
}

/// One function (or one file) of the program under analysis.
///
/// Equality, ordering, and hashing all go through `identity()`:
/// `name` or `name signature` at function granularity, `signature` at file
/// granularity.
#[derive(Debug, Clone, Serialize)]
pub struct Call {
    name: String,
    signature: String,
    environment: Environment,
    granularity: Granularity,
    identity: String,
}

impl Call {
    pub fn new(
        name: impl Into<String>,
        signature: impl Into<String>,
        environment: Environment,
        granularity: Granularity,
    ) -> Self {
        let name = name.into();
        let signature = signature.into();
        let identity = Self::compute_identity(&name, &signature, granularity);
        Self {
            name,
            signature,
            environment,
            granularity,
            identity,
        }
    }

    /// A function-granularity call.
    pub fn function(
        name: impl Into<String>,
        signature: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self::new(name, signature, environment, Granularity::Function)
    }

    /// A file-granularity call. The name is always empty.
    pub fn file(signature: impl Into<String>, environment: Environment) -> Self {
        Self::new("", signature, environment, Granularity::File)
    }

    fn compute_identity(name: &str, signature: &str, granularity: Granularity) -> String {
        match granularity {
            Granularity::File => signature.to_string(),
            Granularity::Function if signature.is_empty() => name.to_string(),
            Granularity::Function => format!("{name} {signature}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// True when the producer gave no signature for this call.
    pub fn is_function_name_only(&self) -> bool {
        self.signature.is_empty()
    }

    /// Same call with its signature replaced.
    pub fn with_signature(&self, signature: impl Into<String>) -> Self {
        Self::new(self.name.clone(), signature, self.environment, self.granularity)
    }

    /// Collapse to file granularity. `None` when there is no file to collapse to.
    pub fn to_file(&self) -> Option<Self> {
        match self.granularity {
            Granularity::File => Some(self.clone()),
            Granularity::Function if self.signature.is_empty() => None,
            Granularity::Function => Some(Self::file(self.signature.clone(), self.environment)),
        }
    }

    /// Collapse to `granularity`, if possible.
    pub fn at_granularity(&self, granularity: Granularity) -> Option<Self> {
        match granularity {
            Granularity::Function => Some(self.clone()),
            Granularity::File => self.to_file(),
        }
    }

    /// Java only: the signature minus its last dotted component.
    pub fn package(&self) -> &str {
        match self.environment {
            Environment::C => "",
            Environment::Android => match self.signature.rfind('.') {
                Some(pos) => &self.signature[..pos],
                None => &self.signature,
            },
        }
    }

    /// Standard input function (makes its caller an entry point).
    pub fn is_input(&self) -> bool {
        match self.environment {
            Environment::C => self.is_c_library_name() && stdlib::c_input().contains(self.name()),
            Environment::Android => {
                self.is_android_framework() && stdlib::android_matches(stdlib::android_input(), self)
            }
        }
    }

    /// Standard output function (makes its caller an exit point).
    pub fn is_output(&self) -> bool {
        match self.environment {
            Environment::C => self.is_c_library_name() && stdlib::c_output().contains(self.name()),
            Environment::Android => {
                self.is_android_framework()
                    && stdlib::android_matches(stdlib::android_output(), self)
            }
        }
    }

    /// Risky system function (makes its caller dangerous).
    pub fn is_dangerous(&self) -> bool {
        match self.environment {
            Environment::C => {
                self.is_c_library_name() && stdlib::c_dangerous().contains(self.name())
            }
            Environment::Android => false,
        }
    }

    /// Any standard library function. Such calls never become graph nodes.
    pub fn in_stdlib(&self) -> bool {
        match self.environment {
            Environment::C => {
                self.is_c_library_name()
                    && (stdlib::c_std_lib().contains(self.name())
                        || stdlib::c_input().contains(self.name())
                        || stdlib::c_output().contains(self.name())
                        || stdlib::c_dangerous().contains(self.name()))
            }
            Environment::Android => self.is_android_framework(),
        }
    }

    fn is_c_library_name(&self) -> bool {
        self.granularity == Granularity::Function && self.signature.is_empty()
    }

    fn is_android_framework(&self) -> bool {
        self.granularity == Granularity::Function && stdlib::is_android_framework(&self.signature)
    }
}

impl PartialEq for Call {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Call {}

impl Hash for Call {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl PartialOrd for Call {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Call {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity.cmp(&other.identity)
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.environment, self.granularity) {
            (Environment::Android, Granularity::Function) => {
                write!(f, "{}.{}", self.signature, self.name)
            }
            _ => f.write_str(&self.identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_function_granularity() {
        let call = Call::function("greet", "./src/greetings.c", Environment::C);
        assert_eq!(call.identity(), "greet ./src/greetings.c");
        assert_eq!(Call::function("printf", "", Environment::C).identity(), "printf");
    }

    #[test]
    fn test_identity_file_granularity() {
        let call = Call::file("./src/greetings.c", Environment::C);
        assert_eq!(call.identity(), "./src/greetings.c");
        assert_eq!(call.name(), "");
    }

    #[test]
    fn test_equality_ignores_environment() {
        let a = Call::function("main", "", Environment::C);
        let b = Call::function("main", "", Environment::Android);
        assert_eq!(a, b);
    }

    #[test]
    fn test_classification_needs_empty_signature() {
        assert!(Call::function("printf", "", Environment::C).is_output());
        assert!(!Call::function("printf", "./src/mine.c", Environment::C).is_output());
        assert!(Call::function("getchar", "", Environment::C).is_input());
        assert!(Call::function("system", "", Environment::C).is_dangerous());
        assert!(Call::function("malloc", "", Environment::C).in_stdlib());
        assert!(!Call::function("greet", "", Environment::C).in_stdlib());
    }

    #[test]
    fn test_to_file_drops_unknown_signature() {
        assert!(Call::function("greet", "", Environment::C).to_file().is_none());
        let file = Call::function("greet", "./a.c", Environment::C).to_file().unwrap();
        assert_eq!(file, Call::file("./a.c", Environment::C));
    }

    #[test]
    fn test_android_package_and_display() {
        let call = Call::function(
            "sayHello",
            "com.example.kevin.helloandroid.Greeter",
            Environment::Android,
        );
        assert_eq!(call.package(), "com.example.kevin.helloandroid");
        assert_eq!(
            call.to_string(),
            "com.example.kevin.helloandroid.Greeter.sayHello"
        );
        assert!(!call.in_stdlib());
    }

    #[test]
    fn test_android_framework_classification() {
        let start = Call::function("startActivity", "android.app.Activity", Environment::Android);
        assert!(start.in_stdlib());
        assert!(start.is_output());

        let query = Call::function("query", "android.content.ContentResolver", Environment::Android);
        assert!(query.is_input());

        // App code overriding a framework callback is not itself an input.
        let own = Call::function("onCreate", "com.example.MainActivity", Environment::Android);
        assert!(!own.is_input());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("C".parse::<Environment>().unwrap(), Environment::C);
        assert!("cobol".parse::<Environment>().is_err());
    }
}
