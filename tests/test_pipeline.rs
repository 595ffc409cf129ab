extern crate fisheye8k;

use std::path::Path;

use fisheye8k::pipeline::{run_pipeline, PipelineConfig, StageConfig};

fn base_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: root.join("data"),
        zoo_dir: root.join("zoo"),
        run_dir: root.join("run"),
        stages: Vec::new(),
    }
}

#[test]
fn config_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");

    let config = base_config(dir.path()).with_stage(
        StageConfig::new("echo-stage", "echo")
            .with_args(["hello", "world"])
            .with_cwd(Path::new("/tmp"))
            .with_env("CUDA_VISIBLE_DEVICES", "0,1"),
    );
    config.save(&path).unwrap();

    let loaded = PipelineConfig::load(&path).unwrap();
    assert_eq!(loaded.data_dir, config.data_dir);
    assert_eq!(loaded.zoo_dir, config.zoo_dir);
    assert_eq!(loaded.run_dir, config.run_dir);
    assert_eq!(loaded.stages.len(), 1);

    let stage = &loaded.stages[0];
    assert_eq!(stage.name, "echo-stage");
    assert_eq!(stage.program, "echo");
    assert_eq!(stage.args, vec!["hello", "world"]);
    assert_eq!(stage.cwd.as_deref(), Some(Path::new("/tmp")));
    assert_eq!(stage.env.get("CUDA_VISIBLE_DEVICES").unwrap(), "0,1");
}

#[test]
fn optional_stage_fields_have_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");

    // A hand-written config can leave args/cwd/env out entirely.
    std::fs::write(
        &path,
        r#"{
            "data_dir": "/data",
            "zoo_dir": "/zoo",
            "run_dir": "/run",
            "stages": [{"name": "lone", "program": "true"}]
        }"#,
    )
    .unwrap();

    let loaded = PipelineConfig::load(&path).unwrap();
    assert_eq!(loaded.stages[0].name, "lone");
    assert!(loaded.stages[0].args.is_empty());
    assert!(loaded.stages[0].cwd.is_none());
    assert!(loaded.stages[0].env.is_empty());
}

#[test]
fn data_dir_env_overrides_default() {
    std::env::set_var("DATA_DIR", "/srv/fisheye-data");
    let config = PipelineConfig::new().unwrap();
    std::env::remove_var("DATA_DIR");

    assert_eq!(config.data_dir, Path::new("/srv/fisheye-data"));
    // Zoo and run stay under the cache root either way.
    assert!(config.zoo_dir.ends_with("fisheye8k/zoo"));
    assert!(config.run_dir.ends_with("fisheye8k/run"));
}

#[test]
fn default_stage_set_covers_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = base_config(dir.path()).with_default_stages(&[1280, 1536]);

    let names: Vec<&str> = config.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "style-transfer-train",
            "style-transfer-export",
            "pseudo-label",
            "train-1280",
            "train-1536",
            "predict-1280",
            "predict-1536",
        ]
    );

    // Each predict stage points its weights at the matching train run.
    let predict = &config.stages[5];
    assert!(predict.args.iter().any(|a| a.contains("yolor_d6_1280")));
}

#[test]
fn unknown_stage_name_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = base_config(dir.path()).with_stage(StageConfig::new("echo-stage", "true"));

    let err = run_pipeline(&config, &["no-such-stage".to_string()]).unwrap_err();
    assert!(err.to_string().contains("no-such-stage"));
}

#[test]
fn failing_stage_aborts_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");

    let config = base_config(dir.path())
        .with_stage(StageConfig::new("ok", "true"))
        .with_stage(StageConfig::new("boom", "false"))
        .with_stage(
            StageConfig::new("after", "touch")
                .with_args([marker.to_str().unwrap()]),
        );

    let err = run_pipeline(&config, &[]).unwrap_err();
    assert!(err.to_string().contains("boom"));
    // The stage behind the failure never ran.
    assert!(!marker.exists());

    // Restricting the run to the healthy stage succeeds.
    run_pipeline(&config, &["ok".to_string()]).unwrap();
}
