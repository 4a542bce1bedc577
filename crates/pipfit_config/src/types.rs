//! Configuration types deserialized from `pipfit.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// The complete run configuration. Every section may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct FitConfig {
    /// Model settings.
    #[serde(default)]
    pub fit: FitSettings,
    /// Least-squares solver settings.
    #[serde(default)]
    pub solver: SolverConfig,
    /// Switch classification rules.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Designs to fit, in order.
    #[serde(default)]
    pub designs: Vec<DesignSpec>,
}

/// Model-level settings.
#[derive(Debug, Deserialize)]
pub struct FitSettings {
    /// Annotation cell (CELLTYPE, or INSTANCE as a fallback) holding the
    /// interconnect delays.
    #[serde(default = "default_top_scope")]
    pub top_scope: String,
    /// Switch classes excluded from the model as zero-delay.
    ///
    /// Accepts a single string or a list.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub zero_delay_classes: Vec<String>,
}

fn default_top_scope() -> String {
    "top".to_string()
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            top_scope: default_top_scope(),
            zero_delay_classes: Vec::new(),
        }
    }
}

/// Accepts either `key = "a"` or `key = ["a", "b"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// LSQR stopping parameters. Defaults follow the usual LSQR conventions.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Iteration limit; `0` means twice the number of variables.
    #[serde(default)]
    pub max_iterations: usize,
    /// Relative error tolerance on the matrix.
    #[serde(default = "default_tolerance")]
    pub atol: f64,
    /// Relative error tolerance on the right-hand side.
    #[serde(default = "default_tolerance")]
    pub btol: f64,
    /// Condition number limit.
    #[serde(default = "default_conlim")]
    pub conlim: f64,
    /// Tikhonov damping factor.
    #[serde(default)]
    pub damp: f64,
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_conlim() -> f64 {
    1e8
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 0,
            atol: default_tolerance(),
            btol: default_tolerance(),
            conlim: default_conlim(),
            damp: 0.0,
        }
    }
}

/// Rule table for the switch classifier.
#[derive(Debug, Default, Deserialize)]
pub struct ClassifierConfig {
    /// Rules tried in order; the first match decides the class.
    #[serde(default)]
    pub rules: Vec<ClassRule>,
}

/// One classification rule.
///
/// A pip matches when every given constraint holds. `class` may refer to
/// capture groups of `dst` (`$1`, `${name}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ClassRule {
    /// Switch class label, possibly with capture references.
    pub class: String,
    /// Regex on the source wire's local name.
    #[serde(default)]
    pub src: Option<String>,
    /// Regex on the destination wire's local name.
    #[serde(default)]
    pub dst: Option<String>,
    /// Required `dst.column - src.column`.
    #[serde(default)]
    pub dx: Option<i32>,
    /// Required `dst.row - src.row`.
    #[serde(default)]
    pub dy: Option<i32>,
}

/// One routed design and its timing annotation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DesignSpec {
    /// JSON route dump of the routed design.
    pub route: PathBuf,
    /// SDF annotation file.
    pub sdf: PathBuf,
}
