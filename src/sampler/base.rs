//! Checks and helpers shared by every sampler strategy.

use super::SamplerKind;
use crate::models::{Result, Sample, SamplerError, SamplerSpec, Value};
use serde_json::Map;
use parking_lot::Mutex;
use std::sync::OnceLock;
use tracing::{debug, info};

pub(crate) const CONSTANTS: &str = "constants";
pub(crate) const PARAMETERS: &str = "parameters";

/// Structural checks every sampler runs before its own.
///
/// `type` must name `kind`, and `constants`, when present, must map names
/// to scalar values.
pub(crate) fn check_base(spec: &SamplerSpec, kind: SamplerKind) -> Result<()> {
    match spec.sampler_type() {
        Some(Value::String(name)) if name == kind.as_str() => {}
        Some(other) => {
            return Err(SamplerError::invalid(
                kind,
                format!("type must be '{kind}', found {other}"),
            ));
        }
        None => return Err(SamplerError::MissingType),
    }

    constants(spec, kind).map(|_| ())
}

/// Require at least one of `constants` / `parameters`.
pub(crate) fn require_constants_or_parameters(spec: &SamplerSpec, kind: SamplerKind) -> Result<()> {
    if !spec.contains_key(CONSTANTS) && !spec.contains_key(PARAMETERS) {
        return Err(SamplerError::invalid(
            kind,
            "Either constants or parameters must be included in the sampler data",
        ));
    }
    Ok(())
}

/// The `constants` mapping, if present.
pub(crate) fn constants(spec: &SamplerSpec, kind: SamplerKind) -> Result<Option<&Map<String, Value>>> {
    let Some(value) = spec.get(CONSTANTS) else {
        return Ok(None);
    };

    let map = value
        .as_object()
        .ok_or_else(|| SamplerError::invalid(kind, "constants must be a mapping"))?;

    if let Some((name, _)) = map.iter().find(|(_, v)| v.is_array() || v.is_object()) {
        return Err(SamplerError::invalid(
            kind,
            format!("constant '{name}' must be a single scalar value"),
        ));
    }

    Ok(Some(map))
}

/// Constant names in specification order, ignoring malformed data.
pub(crate) fn constant_keys(spec: &SamplerSpec) -> Vec<String> {
    spec.get(CONSTANTS)
        .and_then(Value::as_object)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default()
}

/// Start from the constants, then overlay sampler-provided values.
pub(crate) fn overlay<I>(constants: Option<&Map<String, Value>>, values: I) -> Sample
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut sample = Sample::new();
    if let Some(constants) = constants {
        sample.extend(constants.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    sample.extend(values);
    sample
}

/// `parameters` as a mapping of name to value list.
///
/// A scalar entry counts as a one-element list. Absent parameters give an
/// empty list.
pub(crate) fn value_lists(spec: &SamplerSpec, kind: SamplerKind) -> Result<Vec<(String, Vec<Value>)>> {
    let Some(value) = spec.get(PARAMETERS) else {
        return Ok(Vec::new());
    };

    let map = value
        .as_object()
        .ok_or_else(|| SamplerError::invalid(kind, "parameters must be a mapping"))?;

    map.iter()
        .map(|(name, values)| match values {
            Value::Array(items) => {
                if let Some(item) = items.iter().find(|v| v.is_array() || v.is_object()) {
                    Err(SamplerError::invalid(
                        kind,
                        format!("parameter '{name}' contains a non-scalar value {item}"),
                    ))
                } else {
                    Ok((name.clone(), items.clone()))
                }
            }
            Value::Object(_) => Err(SamplerError::invalid(
                kind,
                format!("parameter '{name}' must be a list of values"),
            )),
            scalar => Ok((name.clone(), vec![scalar.clone()])),
        })
        .collect()
}

/// Write-once sample store shared by every sampler.
///
/// Reads after the first build take no lock. The first build runs under
/// `init`, so concurrent first callers wait for one build instead of
/// racing their own.
#[derive(Debug, Default)]
pub(crate) struct SampleCache {
    samples: OnceLock<Vec<Sample>>,
    init: Mutex<()>,
}

impl SampleCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return the cached samples, computing them on first use.
    ///
    /// A failed build stores nothing; the next call tries again.
    pub(crate) fn get_or_build<F>(&self, kind: SamplerKind, build: F) -> Result<&[Sample]>
    where
        F: FnOnce() -> Result<Vec<Sample>>,
    {
        if let Some(samples) = self.samples.get() {
            debug!(sampler = %kind, count = samples.len(), "Returning cached samples");
            return Ok(samples.as_slice());
        }

        let _guard = self.init.lock();
        if let Some(samples) = self.samples.get() {
            return Ok(samples.as_slice());
        }

        let samples = build()?;
        info!(sampler = %kind, count = samples.len(), "Samples generated");
        Ok(self.samples.get_or_init(|| samples).as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn spec(value: Value) -> SamplerSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_check_base_rejects_wrong_type() {
        let s = spec(json!({"type": "list", "constants": {"a": 1}}));
        let err = check_base(&s, SamplerKind::ColumnList).unwrap_err();
        assert!(matches!(err, SamplerError::InvalidSamplerSpec { .. }));
    }

    #[test]
    fn test_constants_must_be_scalars() {
        let s = spec(json!({"type": "list", "constants": {"a": [1, 2]}}));
        let err = constants(&s, SamplerKind::List).unwrap_err();
        assert!(err.to_string().contains("constant 'a'"));

        let s = spec(json!({"type": "list", "constants": "a=1"}));
        assert!(constants(&s, SamplerKind::List).is_err());
    }

    #[test]
    fn test_overlay_precedence() {
        let c = json!({"X1": 20, "X2": 0});
        let sample = overlay(c.as_object(), [("X2".to_string(), json!("5"))]);
        assert_eq!(sample.get("X1"), Some(&json!(20)));
        assert_eq!(sample.get("X2"), Some(&json!("5")));
        assert_eq!(sample.len(), 2);
    }

    #[test]
    fn test_value_lists_promotes_scalars() {
        let s = spec(json!({"type": "list", "parameters": {"a": [1, 2], "b": "x"}}));
        let lists = value_lists(&s, SamplerKind::List).unwrap();
        assert_eq!(lists[0], ("a".to_string(), vec![json!(1), json!(2)]));
        assert_eq!(lists[1], ("b".to_string(), vec![json!("x")]));
    }

    #[test]
    fn test_cached_builds_once() {
        let cache = SampleCache::new();
        let first = cache.get_or_build(SamplerKind::List, || Ok(vec![Sample::new()])).unwrap();
        let second = cache.get_or_build(SamplerKind::List, || panic!("rebuilt")).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let cache = SampleCache::new();
        let err = cache.get_or_build(SamplerKind::List, || Err(SamplerError::MissingType));
        assert!(err.is_err());
        let samples = cache.get_or_build(SamplerKind::List, || Ok(vec![Sample::new()])).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_concurrent_first_calls_build_once() {
        let cache = SampleCache::new();
        let builds = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let samples = cache
                        .get_or_build(SamplerKind::List, || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(20));
                            Ok(vec![Sample::new(), Sample::new()])
                        })
                        .unwrap();
                    assert_eq!(samples.len(), 2);
                });
            }
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }
}
