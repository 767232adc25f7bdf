use super::utils::{CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE, ensure_model_files};
use super::*;
use tempfile::TempDir;

#[test]
fn test_head_spec_single_logit() {
    let config = serde_json::json!({ "num_labels": 1 });
    let head = HeadSpec::from_config(&config).unwrap();
    assert_eq!(head.num_labels, 1);
}

#[test]
fn test_head_spec_from_id2label() {
    let config = serde_json::json!({
        "id2label": { "0": "NEGATIVE", "1": "POSITIVE" }
    });
    let head = HeadSpec::from_config(&config).unwrap();
    assert_eq!(
        head,
        HeadSpec {
            num_labels: 2,
            positive_index: 1
        }
    );
}

#[test]
fn test_head_spec_positive_label_first() {
    let config = serde_json::json!({
        "id2label": { "0": "positive", "1": "negative" }
    });
    let head = HeadSpec::from_config(&config).unwrap();
    assert_eq!(head.positive_index, 0);
}

#[test]
fn test_head_spec_defaults_to_two_labels() {
    let head = HeadSpec::from_config(&serde_json::json!({})).unwrap();
    assert_eq!(
        head,
        HeadSpec {
            num_labels: 2,
            positive_index: 1
        }
    );
}

#[test]
fn test_head_spec_rejects_multiclass() {
    let config = serde_json::json!({
        "id2label": { "0": "sad", "1": "neutral", "2": "happy" }
    });
    assert!(matches!(
        HeadSpec::from_config(&config),
        Err(ModelError::InvalidConfig { .. })
    ));
}

#[test]
fn test_ensure_model_files_missing_dir() {
    let result = ensure_model_files(std::path::Path::new("/nonexistent/sentiment/model"));
    assert!(matches!(result, Err(ModelError::ModelNotFound { .. })));
}

#[test]
fn test_ensure_model_files_missing_weights() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "{}").unwrap();
    std::fs::write(dir.path().join(TOKENIZER_FILE), "{}").unwrap();

    let err = ensure_model_files(dir.path()).unwrap_err();
    assert!(matches!(err, ModelError::ModelLoadFailed { .. }));
    assert!(err.to_string().contains(WEIGHTS_FILE));
}

#[test]
fn test_bert_loader_missing_model() {
    let result = BertLoader::new().load(
        std::path::Path::new("/nonexistent/sentiment/model"),
        "classifier",
    );
    assert!(matches!(result, Err(ModelError::ModelNotFound { .. })));
}

#[test]
fn test_bert_loader_rejects_bad_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "not json").unwrap();
    std::fs::write(dir.path().join(WEIGHTS_FILE), b"").unwrap();
    std::fs::write(dir.path().join(TOKENIZER_FILE), "{}").unwrap();

    let result = BertLoader::new().load(dir.path(), "classifier");
    assert!(matches!(result, Err(ModelError::InvalidConfig { .. })));
}

#[test]
fn test_select_device_falls_back_to_cpu() {
    let device = device::select_device();
    if !cfg!(any(feature = "metal", feature = "cuda")) {
        assert!(device.is_cpu());
        assert_eq!(device::device_label(&device), "cpu");
    }
}

#[test]
fn test_mock_fixed_probability() {
    let model = MockModel::new(MockBehavior::Fixed(0.9));
    let out = model.forward(&["anything"]).unwrap();
    assert_eq!(out, vec![vec![0.9]]);
    assert_eq!(model.calls(), 1);
}

#[test]
fn test_mock_lexicon_direction() {
    assert!(MockModel::lexicon_probability("What a great, wonderful movie!") > 0.5);
    assert!(MockModel::lexicon_probability("Terrible plot and awful acting.") < 0.5);
    assert_eq!(MockModel::lexicon_probability("The film is two hours long."), 0.5);
}

#[test]
fn test_mock_failure_and_empty_output() {
    let failing = MockModel::new(MockBehavior::Fail("boom".to_string()));
    assert!(matches!(
        failing.forward(&["x"]),
        Err(ModelError::InferenceFailed { .. })
    ));

    let empty = MockModel::new(MockBehavior::EmptyOutput);
    assert!(empty.forward(&["x"]).unwrap().is_empty());
}

#[test]
fn test_mock_loader_shares_call_counter() {
    let loader = MockLoader::fixed(0.3);
    let model = loader
        .load(std::path::Path::new("."), "classifier")
        .unwrap();
    model.forward(&["a"]).unwrap();
    model.forward(&["b"]).unwrap();
    assert_eq!(loader.model().calls(), 2);
}

#[test]
fn test_mock_loader_failing() {
    let loader = MockLoader::failing("corrupt weights");
    let err = loader
        .load(std::path::Path::new("."), "classifier")
        .unwrap_err();
    assert!(err.to_string().contains("corrupt weights"));
}

mod bert_forward {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::{VarBuilder, VarMap};
    use candle_transformers::models::bert::{BertModel, Config as BertConfig};

    const HIDDEN: usize = 8;
    const MAX_POSITIONS: usize = 16;
    const VOCAB: &[&str] = &[
        "[PAD]", "[UNK]", "great", "movie", "this", "is", "a", "bad", "terrible", "film",
    ];

    fn encoder_config(num_labels: usize, id2label: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "vocab_size": VOCAB.len(),
            "hidden_size": HIDDEN,
            "num_hidden_layers": 1,
            "num_attention_heads": 2,
            "intermediate_size": 16,
            "hidden_act": "gelu",
            "hidden_dropout_prob": 0.0,
            "max_position_embeddings": MAX_POSITIONS,
            "type_vocab_size": 2,
            "initializer_range": 0.02,
            "layer_norm_eps": 1e-12,
            "pad_token_id": 0,
            "position_embedding_type": "absolute",
            "use_cache": false,
            "num_labels": num_labels,
            "id2label": id2label,
        })
    }

    fn binary_labels() -> serde_json::Value {
        serde_json::json!({ "0": "NEGATIVE", "1": "POSITIVE" })
    }

    fn write_config(dir: &std::path::Path, config: &serde_json::Value) {
        std::fs::write(dir.join(CONFIG_FILE), config.to_string()).unwrap();
    }

    fn write_tokenizer(dir: &std::path::Path) {
        let vocab: serde_json::Map<String, serde_json::Value> = VOCAB
            .iter()
            .enumerate()
            .map(|(id, word)| (word.to_string(), serde_json::json!(id)))
            .collect();

        let tokenizer = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]" }
        });
        std::fs::write(dir.join(TOKENIZER_FILE), tokenizer.to_string()).unwrap();
    }

    /// Writes a randomly initialized classifier with encoder weights under `prefix`.
    fn write_model(dir: &std::path::Path, prefix: &str, num_labels: usize) {
        let config_json = encoder_config(num_labels, binary_labels());
        let config: BertConfig = serde_json::from_value(config_json.clone()).unwrap();

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        BertModel::load(vb.pp(prefix), &config).unwrap();
        candle_nn::linear(HIDDEN, HIDDEN, vb.pp(prefix).pp("pooler").pp("dense")).unwrap();
        candle_nn::linear(HIDDEN, num_labels, vb.pp("classifier")).unwrap();
        varmap.save(dir.join(WEIGHTS_FILE)).unwrap();

        write_config(dir, &config_json);
        write_tokenizer(dir);
    }

    fn assert_probability(value: f32) {
        assert!(
            value.is_finite() && (0.0..=1.0).contains(&value),
            "not a probability: {value}"
        );
    }

    #[test]
    fn test_two_logit_head_batch_of_different_lengths() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "bert", 2);
        let model = BertLoader::new().load(dir.path(), "classifier").unwrap();

        let batch = ["great movie", "this is a bad bad bad movie"];
        let out = model.forward(&batch).unwrap();

        assert_eq!(out.len(), 2);
        for row in &out {
            assert_eq!(row.len(), 1);
            assert_probability(row[0]);
        }

        // Padding the shorter input must not change its score.
        for (text, row) in batch.iter().zip(&out) {
            let single = model.forward(&[*text]).unwrap();
            assert!(
                (single[0][0] - row[0]).abs() < 1e-4,
                "{text}: batched {} vs single {}",
                row[0],
                single[0][0]
            );
        }
    }

    #[test]
    fn test_single_logit_head_uses_sigmoid() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "bert", 1);
        let model = BertLoader::new().load(dir.path(), "classifier").unwrap();

        let out = model.forward(&["great film"]).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 1);
        assert_probability(out[0][0]);
        assert!(model.runtime_version().starts_with("candle"));
    }

    #[test]
    fn test_positive_label_order_selects_softmax_column() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "bert", 2);
        let text = ["this movie is terrible"];

        let default_order = BertLoader::new()
            .load(dir.path(), "classifier")
            .unwrap()
            .forward(&text)
            .unwrap()[0][0];

        write_config(
            dir.path(),
            &encoder_config(2, serde_json::json!({ "0": "POSITIVE", "1": "NEGATIVE" })),
        );
        let swapped_order = BertLoader::new()
            .load(dir.path(), "classifier")
            .unwrap()
            .forward(&text)
            .unwrap()[0][0];

        assert!((default_order + swapped_order - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_root_prefixed_weights_load() {
        let dir = TempDir::new().unwrap();
        let config_json = encoder_config(2, binary_labels());
        let config: BertConfig = serde_json::from_value(config_json.clone()).unwrap();

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        BertModel::load(vb.clone(), &config).unwrap();
        candle_nn::linear(HIDDEN, 2, vb.pp("classifier")).unwrap();
        varmap.save(dir.path().join(WEIGHTS_FILE)).unwrap();
        write_config(dir.path(), &config_json);
        write_tokenizer(dir.path());

        let model = BertLoader::new().load(dir.path(), "classifier").unwrap();
        let out = model.forward(&["a film"]).unwrap();
        assert_eq!(out.len(), 1);
        assert_probability(out[0][0]);
    }

    #[test]
    fn test_input_longer_than_position_table_is_truncated() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "bert", 2);
        let model = BertLoader::new().load(dir.path(), "classifier").unwrap();

        let long_text = vec!["great"; 40].join(" ");
        let out = model.forward(&[long_text.as_str()]).unwrap();

        assert_eq!(out.len(), 1);
        assert_probability(out[0][0]);
    }

    #[test]
    fn test_missing_entry_point_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "bert", 2);

        let result = BertLoader::new().load(dir.path(), "classifier.out_proj");
        assert!(matches!(result, Err(ModelError::InvalidConfig { .. })));
    }

    #[test]
    fn test_roberta_weights_are_rejected() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "roberta", 2);

        let result = BertLoader::new().load(dir.path(), "classifier");
        assert!(matches!(result, Err(ModelError::ModelLoadFailed { .. })));
    }

    #[test]
    fn test_non_bert_model_type_is_rejected() {
        let mut config = encoder_config(2, binary_labels());
        config["model_type"] = serde_json::json!("roberta");
        assert!(matches!(
            bert::ensure_bert_config(&config),
            Err(ModelError::InvalidConfig { .. })
        ));

        config["model_type"] = serde_json::json!("bert");
        assert!(bert::ensure_bert_config(&config).is_ok());
        assert!(bert::ensure_bert_config(&serde_json::json!({})).is_ok());
    }
}
