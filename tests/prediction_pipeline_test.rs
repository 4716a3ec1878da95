use apt_price_predictor::utils::error::PipelineError;
use apt_price_predictor::{
    ApartmentFeatures, GatewayState, LocalArtifactStore, ModelColumn, PredictionPipeline,
    PredictorConfig, PredictorEngine, PricePipeline, Record,
};
use std::sync::Arc;
use tempfile::TempDir;

fn sample_features() -> ApartmentFeatures {
    ApartmentFeatures {
        size: 500,
        year_built: 2006,
        hallway_type: "Mixed".to_string(),
        time_to_subway: "5min~10min".to_string(),
        subway_station: "Banwoldang".to_string(),
        num_facilities_in_apt: 3,
        num_parking: 181,
        num_universities: 1,
        num_public_offices: 2,
        num_other_facilities: 1,
    }
}

fn write_model(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("final_model.json");
    std::fs::write(&path, json).unwrap();
    path
}

fn pipeline_for(path: &std::path::Path) -> PricePipeline<LocalArtifactStore> {
    let config = PredictorConfig::for_model(path);
    PricePipeline::from_config(LocalArtifactStore::new(config.model_path()), &config)
}

#[tokio::test]
async fn test_end_to_end_with_constant_model() {
    let dir = TempDir::new().unwrap();
    let path = write_model(&dir, r#"{"kind": "constant", "value": 210000.0}"#);

    let engine = PredictorEngine::new(pipeline_for(&path));
    let result = engine.run(&sample_features().into()).await.unwrap();

    assert_eq!(result.raw_value, 210000.0);
    assert!(result.formatted_value.contains("210,000"));
    assert_eq!(result.accuracy_pct, 80.5);
    assert_eq!(result.avg_error_amount, 37816.0);
}

#[tokio::test]
async fn test_end_to_end_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("final_model.json");

    let pipeline = pipeline_for(&path);
    let err = pipeline
        .run_prediction(&sample_features().into())
        .await
        .unwrap_err();

    match err {
        PipelineError::ArtifactMissing { path: reported } => {
            assert!(reported.ends_with("final_model.json"));
        }
        other => panic!("expected ArtifactMissing, got {:?}", other),
    }
    assert_eq!(pipeline.gateway().state(), GatewayState::Failed);
}

#[tokio::test]
async fn test_artifact_is_not_reread_after_load() {
    let dir = TempDir::new().unwrap();
    let path = write_model(&dir, r#"{"kind": "constant", "value": 150000.0}"#);
    let pipeline = pipeline_for(&path);

    pipeline.warm_up().await.unwrap();
    std::fs::remove_file(&path).unwrap();

    for _ in 0..3 {
        let result = pipeline
            .run_prediction(&sample_features().into())
            .await
            .unwrap();
        assert_eq!(result.raw_value, 150000.0);
    }
    assert_eq!(pipeline.gateway().state(), GatewayState::Ready);
}

#[tokio::test]
async fn test_artifact_with_wrong_column_order_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let mut names: Vec<&str> = ModelColumn::TRAINED_ORDER.iter().map(|c| c.as_str()).collect();
    names.reverse();
    let json = serde_json::json!({"kind": "constant", "value": 1.0, "feature_names": names});
    let path = write_model(&dir, &json.to_string());

    let err = pipeline_for(&path)
        .run_prediction(&sample_features().into())
        .await
        .unwrap_err();

    match err {
        PipelineError::ArtifactCorrupt { reason, .. } => {
            assert!(reason.contains("column order mismatch"));
        }
        other => panic!("expected ArtifactCorrupt, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_onnx_binary_artifact_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("final_model.onnx");
    // A pickled scikit-learn model is not loadable here.
    std::fs::write(&path, b"\x80\x04\x95\x1a\x00\x00\x00sklearn.ensemble").unwrap();

    let pipeline = pipeline_for(&path);
    let err = pipeline
        .run_prediction(&sample_features().into())
        .await
        .unwrap_err();

    match err {
        PipelineError::ArtifactCorrupt { path: reported, reason } => {
            assert!(reported.ends_with("final_model.onnx"));
            assert!(reason.starts_with("invalid ONNX model"), "{}", reason);
        }
        other => panic!("expected ArtifactCorrupt, got {:?}", other),
    }
    assert_eq!(pipeline.gateway().state(), GatewayState::Failed);
}

#[tokio::test]
async fn test_validation_error_names_field() {
    let dir = TempDir::new().unwrap();
    let path = write_model(&dir, r#"{"kind": "constant", "value": 1.0}"#);
    let pipeline = pipeline_for(&path);

    let mut features = sample_features();
    features.num_parking = 182;

    match pipeline.run_prediction(&features.into()).await {
        Err(PipelineError::Validation { field, value, .. }) => {
            assert_eq!(field, "num_parking");
            assert_eq!(value, "182");
        }
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_untyped_request_with_wrong_type() {
    let dir = TempDir::new().unwrap();
    let path = write_model(&dir, r#"{"kind": "constant", "value": 1.0}"#);

    let raw: Record = Record::from(sample_features()).with("year_built", "2006");
    let err = pipeline_for(&path).run_prediction(&raw).await.unwrap_err();

    assert!(matches!(err, PipelineError::Validation { ref field, .. } if field == "year_built"));
    assert!(err.user_friendly_message().contains("year_built"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_model() {
    let dir = TempDir::new().unwrap();
    let path = write_model(&dir, r#"{"kind": "constant", "value": 99999.9}"#);
    let engine = Arc::new(PredictorEngine::new(pipeline_for(&path)));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.run(&sample_features().into()).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.formatted_value, "💰 99,999 ₩");
    }
    assert_eq!(engine.pipeline().gateway().state(), GatewayState::Ready);
}
