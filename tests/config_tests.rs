//! Tests for loading the shaping configuration from YAML

use shape::prelude::*;

const DEMO_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/course_library.yaml");

#[test]
fn test_demo_file_matches_default_config() {
    let from_file = ProjectionConfig::from_yaml_file(DEMO_CONFIG).unwrap();
    assert_eq!(from_file, ProjectionConfig::default_config());
}

#[test]
fn test_projector_from_file() {
    let config = ProjectionConfig::from_yaml_file(DEMO_CONFIG).unwrap();
    let projector = Projector::from_config(config).unwrap();
    assert_eq!(projector.registry().len(), 2);

    let mapping = projector.registry().lookup("course", "Course").unwrap();
    assert!(mapping.contains_key("description"));
}

#[test]
fn test_invalid_mapping_aborts_startup() {
    let yaml = r#"
base_url: http://localhost
mappings:
  - exposed: author
    storage: Author
    entries:
      Age:
        fields: []
"#;
    let config = ProjectionConfig::from_yaml_str(yaml).unwrap();
    let err = Projector::from_config(config).unwrap_err();
    assert!(matches!(
        err,
        ProjectionError::Mapping(MappingError::EmptyEntry { ref key }) if key == "Age"
    ));
}

#[test]
fn test_duplicate_mapping_aborts_startup() {
    let yaml = r#"
base_url: http://localhost
mappings:
  - exposed: author
    storage: Author
    entries:
      Id: { fields: [Id] }
  - exposed: author
    storage: Author
    entries:
      Id: { fields: [Id] }
"#;
    let config = ProjectionConfig::from_yaml_str(yaml).unwrap();
    let err = Projector::from_config(config).unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_MAPPING");
}

#[test]
fn test_invalid_base_url_aborts_startup() {
    let config = ProjectionConfig::from_yaml_str("base_url: nowhere").unwrap();
    let err = Projector::from_config(config).unwrap_err();
    assert!(matches!(
        err,
        ProjectionError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "base_url"
    ));
}

#[test]
fn test_missing_base_url_is_a_parse_error() {
    assert!(ProjectionConfig::from_yaml_str("paging: {}").is_err());
}
