//! Rule-table classifier built from `[[classifier.rules]]`.

use crate::class::{SwitchClass, WireRef};
use crate::error::ClassifyError;
use crate::PipClassifier;
use pipfit_config::{ClassRule, ClassifierConfig};
use regex::Regex;

#[derive(Debug)]
struct CompiledRule {
    class: String,
    src: Option<Regex>,
    dst: Option<Regex>,
    dx: Option<i32>,
    dy: Option<i32>,
}

impl CompiledRule {
    fn compile(index: usize, rule: &ClassRule) -> Result<Self, ClassifyError> {
        let compile = |pattern: &Option<String>| -> Result<Option<Regex>, ClassifyError> {
            pattern
                .as_deref()
                .map(|p| {
                    Regex::new(p).map_err(|source| ClassifyError::BadPattern {
                        index,
                        pattern: p.to_string(),
                        source,
                    })
                })
                .transpose()
        };
        Ok(Self {
            class: rule.class.clone(),
            src: compile(&rule.src)?,
            dst: compile(&rule.dst)?,
            dx: rule.dx,
            dy: rule.dy,
        })
    }

    fn apply<'a>(&self, src: WireRef<'a>, dst: WireRef<'a>) -> Option<SwitchClass> {
        let delta = |a: i32, b: i32| i64::from(b) - i64::from(a);
        if self.dx.is_some_and(|dx| delta(src.column, dst.column) != i64::from(dx)) {
            return None;
        }
        if self.dy.is_some_and(|dy| delta(src.row, dst.row) != i64::from(dy)) {
            return None;
        }
        let src_caps = match &self.src {
            Some(re) => Some(re.captures(src.name)?),
            None => None,
        };
        let dst_caps = match &self.dst {
            Some(re) => Some(re.captures(dst.name)?),
            None => None,
        };
        let label = match dst_caps.or(src_caps) {
            Some(caps) => {
                let mut label = String::new();
                caps.expand(&self.class, &mut label);
                label
            }
            None => self.class.clone(),
        };
        Some(SwitchClass::new(label))
    }
}

/// Classifies pips by the first matching configured rule.
///
/// A rule matches when its `src`/`dst` patterns match the local wire names
/// and its `dx`/`dy` offsets equal the tile displacement of the pip. The
/// class label may reference capture groups of `dst`, or of `src` when the
/// rule has no `dst` pattern.
#[derive(Debug, Default)]
pub struct RuleClassifier {
    rules: Vec<CompiledRule>,
}

impl RuleClassifier {
    /// Compiles the configured rules.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let rules = config
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| CompiledRule::compile(i, rule))
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules, in which case nothing is
    /// classified.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PipClassifier for RuleClassifier {
    fn classify(&self, src: WireRef<'_>, dst: WireRef<'_>) -> Option<SwitchClass> {
        self.rules.iter().find_map(|rule| rule.apply(src, dst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(class: &str, src: Option<&str>, dst: Option<&str>) -> ClassRule {
        ClassRule {
            class: class.to_string(),
            src: src.map(str::to_string),
            dst: dst.map(str::to_string),
            dx: None,
            dy: None,
        }
    }

    fn classifier(rules: Vec<ClassRule>) -> RuleClassifier {
        RuleClassifier::from_config(&ClassifierConfig { rules }).unwrap()
    }

    fn w(name: &str) -> WireRef<'_> {
        WireRef::new(1, 1, name)
    }

    #[test]
    fn first_match_wins() {
        let c = classifier(vec![
            rule("SPECIFIC", None, Some("^JA0$")),
            rule("GENERIC", None, Some("^J")),
        ]);
        assert_eq!(c.classify(w("X"), w("JA0")), Some("SPECIFIC".into()));
        assert_eq!(c.classify(w("X"), w("JB0")), Some("GENERIC".into()));
        assert_eq!(c.classify(w("X"), w("H00")), None);
    }

    #[test]
    fn class_expands_dst_captures() {
        let c = classifier(vec![rule("H0$1", None, Some(r"^H0(\d)"))]);
        assert_eq!(c.classify(w("A"), w("H02E0001")), Some("H02".into()));
    }

    #[test]
    fn class_expands_src_captures_without_dst() {
        let c = classifier(vec![rule("from_${dir}", Some(r"^V06(?P<dir>[NS])"), None)]);
        assert_eq!(c.classify(w("V06N0003"), w("X")), Some("from_N".into()));
    }

    #[test]
    fn both_patterns_must_match() {
        let c = classifier(vec![rule("CIB", Some("^J"), Some("^CIB"))]);
        assert_eq!(c.classify(w("JQ0"), w("CIB3")), Some("CIB".into()));
        assert_eq!(c.classify(w("KQ0"), w("CIB3")), None);
    }

    #[test]
    fn tile_offsets_constrain() {
        let mut r = rule("EAST1", None, None);
        r.dx = Some(1);
        r.dy = Some(0);
        let c = classifier(vec![r]);
        assert_eq!(
            c.classify(WireRef::new(4, 2, "a"), WireRef::new(5, 2, "b")),
            Some("EAST1".into())
        );
        assert_eq!(
            c.classify(WireRef::new(4, 2, "a"), WireRef::new(4, 2, "b")),
            None
        );
    }

    #[test]
    fn extreme_tile_offsets_do_not_overflow() {
        let mut r = rule("FAR", None, None);
        r.dx = Some(-1);
        r.dy = Some(0);
        let c = classifier(vec![r]);
        let (lo, hi) = (WireRef::new(i32::MIN, 0, "a"), WireRef::new(i32::MAX, 0, "b"));
        assert_eq!(c.classify(lo, hi), None);
        assert_eq!(c.classify(hi, lo), None);
        assert_eq!(
            c.classify(WireRef::new(i32::MIN + 1, 0, "a"), WireRef::new(i32::MIN, 0, "b")),
            Some("FAR".into())
        );
    }

    #[test]
    fn catch_all_rule() {
        let c = classifier(vec![rule("ANY", None, None)]);
        assert_eq!(c.classify(w("a"), w("b")), Some("ANY".into()));
    }

    #[test]
    fn empty_rule_set_classifies_nothing() {
        let c = classifier(Vec::new());
        assert!(c.is_empty());
        assert_eq!(c.classify(w("a"), w("b")), None);
    }

    #[test]
    fn bad_pattern_reports_index() {
        let err = RuleClassifier::from_config(&ClassifierConfig {
            rules: vec![rule("A", None, None), rule("B", Some("("), None)],
        })
        .unwrap_err();
        assert!(matches!(err, ClassifyError::BadPattern { index: 1, .. }));
    }
}
