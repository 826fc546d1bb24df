//! End-to-end path resolution scenarios against real directories

use baw_cache::{
    AudioCache, AudioSchema, DatasetCache, DatasetSchema, Error, KeySchema, Params, StorageRoots,
    ValidationReason, WritePolicy,
};
use std::path::PathBuf;
use tempfile::TempDir;

const UUID: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619";

fn clip_params() -> Params {
    Params::new()
        .with("id", UUID)
        .with("start_offset", 8.1)
        .with("end_offset", 20.02)
        .with("channel", 0)
        .with("sample_rate", 22050)
        .with("format", "wav")
}

#[test]
fn test_audio_name_and_shard() {
    let cache = AudioCache::new(StorageRoots::new(["/cache"]).unwrap(), AudioSchema::default());
    let key = cache.validate(&clip_params()).unwrap();

    assert_eq!(
        cache.file_name(&key),
        "5498633d-89a7-4b65-8f4a-96aa0c09c619_8.1_20.02_0_22050.wav"
    );
    assert_eq!(cache.partial_path(&key), "54");
}

#[test]
fn test_audio_default_variant_name() {
    let schema = AudioSchema::default();
    let key = schema.validate(&clip_params()).unwrap();
    assert_eq!(
        schema.default_file_name(&key).as_deref(),
        Some("5498633d-89a7-4b65-8f4a-96aa0c09c619_0.0_20.02_0_22050.mp3")
    );
}

#[test]
fn test_dataset_round_trip() {
    let cache = DatasetCache::new(StorageRoots::new(["/datasets"]).unwrap(), DatasetSchema);
    let key = cache
        .validate(
            &Params::new()
                .with("saved_search_id", 12)
                .with("dataset_id", 34)
                .with("format", "csv"),
        )
        .unwrap();
    assert_eq!(cache.file_name(&key), "12_34.csv");
    assert_eq!(cache.parse_file_path("12_34.csv").unwrap(), key);
    assert_eq!(cache.parse_file_path("/datasets/12_34.csv").unwrap(), key);
}

#[test]
fn test_invalid_name_is_parse_error() {
    let cache = AudioCache::new(StorageRoots::default(), AudioSchema::default());
    let err = cache.parse_file_path("not_a_valid_name").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_multi_root_only_second_exists() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    std::fs::create_dir(&b).unwrap();

    let cache = AudioCache::new(
        StorageRoots::new([a.clone(), b.clone()]).unwrap(),
        AudioSchema::default(),
    );
    let key = cache.validate(&clip_params()).unwrap();

    assert_eq!(cache.possible_dirs(), [a.clone(), b.clone()]);
    assert_eq!(cache.existing_dirs(), vec![b.clone()]);

    let paths = cache.possible_paths(&key);
    assert_eq!(paths.len(), 4);
    assert!(paths[0].starts_with(&a));
    assert!(paths[1].starts_with(&a));
    assert!(paths[2].starts_with(&b));
    assert_eq!(
        paths[0],
        a.join("54").join("5498633d-89a7-4b65-8f4a-96aa0c09c619_8.1_20.02_0_22050.wav")
    );

    // Resolution stays pure: the missing root is still the default write target
    assert!(cache.write_path(&key).unwrap().starts_with(&a));
    assert!(!a.exists());
    let cache = cache.with_write_policy(WritePolicy::FirstExisting);
    assert!(cache.write_path(&key).unwrap().starts_with(&b));
}

#[test]
fn test_legacy_file_found_after_exact_miss() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    let cache = AudioCache::new(StorageRoots::new([&root]).unwrap(), AudioSchema::default());
    let key = cache.validate(&clip_params()).unwrap();

    let legacy = root
        .join("54")
        .join("5498633d-89a7-4b65-8f4a-96aa0c09c619_0.0_20.02_0_22050.mp3");
    std::fs::create_dir_all(legacy.parent().unwrap()).unwrap();
    std::fs::write(&legacy, b"legacy clip").unwrap();

    assert_eq!(cache.locate(&key), Some(legacy.clone()));
    // writes never target the legacy name
    assert_ne!(cache.write_path(&key).unwrap(), legacy);
}

#[test]
fn test_rejections_name_the_field() {
    let schema = AudioSchema::default();
    let cases: [(Params, &str); 5] = [
        (clip_params().with("end_offset", 8.1), "end_offset"),
        (clip_params().with("channel", -2), "channel"),
        (clip_params().with("sample_rate", 0), "sample_rate"),
        (clip_params().with("format", "."), "format"),
        (
            Params::new()
                .with("start_offset", 0)
                .with("end_offset", 1)
                .with("channel", 0)
                .with("sample_rate", 22050)
                .with("format", "wav"),
            "id",
        ),
    ];
    for (params, field) in cases {
        match schema.validate(&params) {
            Err(Error::Validation { field: got, .. }) => assert_eq!(got, field),
            other => panic!("expected validation error for {field}, got {other:?}"),
        }
    }
}

#[test]
fn test_wrong_type_reported() {
    let schema = AudioSchema::default();
    let err = schema
        .validate(&clip_params().with("sample_rate", "22050"))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation {
            field: "sample_rate",
            reason: ValidationReason::WrongType { .. }
        }
    ));
}

#[test]
fn test_params_from_job_payload() {
    let payload = serde_json::json!({
        "id": UUID,
        "start_offset": 8.1,
        "end_offset": 20.02,
        "channel": 0,
        "sample_rate": 22050,
        "format": ".WAV",
        "priority": "high"
    });
    let params = Params::try_from(payload).unwrap();
    let key = AudioSchema::default().validate(&params).unwrap();
    assert_eq!(key.format(), "wav");
    assert_eq!(key.id().to_string(), UUID);
    assert_eq!(key.channel(), 0);
    assert_eq!(key.sample_rate(), 22050);
    assert!((key.end_offset() - 20.02).abs() < f64::EPSILON);
    let _: Vec<PathBuf> = AudioCache::new(StorageRoots::default(), AudioSchema::default())
        .possible_paths(&key);
}
