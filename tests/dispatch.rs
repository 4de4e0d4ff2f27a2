//! End-to-end dispatch from YAML specifications.

use scisample::{
    AnySampler, ConfigError, Sample, Sampler, SamplerError, SamplerSpec, create_sampler,
    sampler_from_file,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const STUDY: &str = r#"
description:
    name: column_study
sampler:
    type: column_list
    constants:
        X1: 20
    parameters: |
        X2       X3
        5        5
        10       10
"#;

#[test]
fn test_study_file_to_samples() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(STUDY.as_bytes()).unwrap();

    let spec = SamplerSpec::from_file(file.path()).unwrap();
    let sampler = create_sampler(&spec).unwrap();
    assert!(matches!(sampler, AnySampler::ColumnList(_)));

    let samples = sampler.get_samples().unwrap();
    let expected: Vec<Sample> = serde_json::from_value(json!([
        {"X1": 20, "X2": "5", "X3": "5"},
        {"X1": 20, "X2": "10", "X3": "10"},
    ]))
    .unwrap();
    assert_eq!(samples, expected.as_slice());
    assert_eq!(sampler.parameters(), ["X1", "X2", "X3"]);
}

#[test]
fn test_samples_survive_spec_mutation() {
    let mut spec = SamplerSpec::from_yaml_str(STUDY).unwrap();
    let sampler = create_sampler(&spec).unwrap();

    let first = sampler.get_samples().unwrap();
    spec.insert("parameters", "X2\n1\n2\n3");
    spec.insert("constants", json!({"X1": 0}));
    let second = sampler.get_samples().unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].get("X1"), Some(&json!(20)));
}

#[test]
fn test_dispatch_errors() {
    let spec = SamplerSpec::from_yaml_str("constants:\n  X1: 20\n").unwrap();
    assert!(matches!(create_sampler(&spec), Err(SamplerError::MissingType)));

    let spec = SamplerSpec::from_yaml_str("type: nonexistent\nconstants:\n  X1: 20\n").unwrap();
    assert!(matches!(
        create_sampler(&spec),
        Err(SamplerError::UnknownSamplerType(name)) if name == "nonexistent"
    ));

    let spec = SamplerSpec::from_yaml_str("type: column_list\n").unwrap();
    let err = create_sampler(&spec).unwrap_err();
    assert!(matches!(err, SamplerError::InvalidSamplerSpec { .. }));
    assert!(err.to_string().contains("Either constants or parameters"));
}

#[test]
fn test_every_registered_type_dispatches() {
    let specs = [
        json!({"type": "column_list", "parameters": "a\n1"}),
        json!({"type": "list", "parameters": {"a": [1, 2]}}),
        json!({"type": "cross_product", "parameters": {"a": [1, 2], "b": [3]}}),
        json!({"type": "csv", "csv_file": "unused.csv"}),
        json!({"type": "random", "num_samples": 2, "parameters": {"a": {"min": 0, "max": 1}}}),
        json!({"type": "custom", "command": "generate-samples"}),
    ];

    for value in specs {
        let spec: SamplerSpec = serde_json::from_value(value).unwrap();
        let sampler = create_sampler(&spec).unwrap();
        assert_eq!(
            Some(&json!(sampler.kind().as_str())),
            spec.sampler_type(),
        );
    }
}

#[test]
fn test_sampler_from_file_error_classes() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(STUDY.as_bytes()).unwrap();
    let sampler = sampler_from_file(file.path()).unwrap();
    assert_eq!(sampler.get_samples().unwrap().len(), 2);

    let err = sampler_from_file(std::path::Path::new("/nonexistent/study.yaml")).unwrap_err();
    assert!(matches!(err, SamplerError::Config(ConfigError::FileRead { .. })));
    assert!(!err.is_dispatch_error());

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type: quantum\nconstants:\n  X1: 1").unwrap();
    let err = sampler_from_file(file.path()).unwrap_err();
    assert!(matches!(err, SamplerError::UnknownSamplerType(ref name) if name == "quantum"));
    assert!(err.is_dispatch_error());
}
