use rand::{rngs::StdRng, SeedableRng};

use linknet::data::synthetic;
use linknet::{evaluate_loss, BuildRequest, LossType, NetError, Session};

fn request(json: &str) -> BuildRequest {
    serde_json::from_str(json).unwrap()
}

const CIRCLE: &str = r#"{
    "architectureParams": {
        "networkShape": [2, 8, 1],
        "activation": "tanh",
        "outputActivation": "tanh",
        "regularisation": "none"
    },
    "trainingParams": { "batchSize": 1, "learningRate": 0.03, "regLambda": 0, "lossFn": "square" },
    "seed": 6
}"#;

#[test]
fn session_trains_one_sample_at_a_time() {
    let mut data = synthetic::circle(200, 0.0, 5);
    data.shuffle(&mut StdRng::seed_from_u64(1));
    let mut session = Session::build(&request(CIRCLE)).unwrap();
    let mut probe = session.network().clone();
    let before = evaluate_loss(&mut probe, &data, LossType::Square).unwrap();

    for _ in 0..60 {
        for (input, label) in data.iter() {
            session.run(input, label).unwrap();
        }
    }
    assert_eq!(session.iterations(), 60 * 200);
    assert_eq!(session.epochs(), 60 * 200);

    let mut trained = session.network().clone();
    let after = evaluate_loss(&mut trained, &data, LossType::Square).unwrap();
    assert!(after < before * 0.5, "before={before} after={after}");
}

#[test]
fn same_seed_builds_the_same_session() {
    let a = Session::build(&request(CIRCLE)).unwrap();
    let b = Session::build(&request(CIRCLE)).unwrap();
    assert_eq!(a.network(), b.network());
}

#[test]
fn unknown_names_are_configuration_errors() {
    for (from, to) in [("\"tanh\",", "\"gelu\","), ("\"square\"", "\"cross\""), ("\"none\"", "\"elastic\"")] {
        let bad = CIRCLE.replacen(from, to, 1);
        let err = Session::build(&request(&bad)).unwrap_err();
        assert!(matches!(err, NetError::InvalidConfig(_)), "{bad}");
    }
}

#[test]
fn build_request_survives_a_file_round_trip() {
    let mut original = request(CIRCLE);
    // Dyadic rate so the JSON text parses back to the same bits.
    original.training_params.learning_rate = 0.25;
    let path = std::env::temp_dir().join(format!("linknet-request-{}.json", std::process::id()));
    let path = path.to_string_lossy().into_owned();
    original.save_json(&path).unwrap();
    let loaded = BuildRequest::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, original);
}

#[test]
fn mismatched_samples_surface_size_errors() {
    let mut session = Session::build(&request(CIRCLE)).unwrap();
    assert!(matches!(
        session.run(&[1.0, 2.0, 3.0], &[1.0]),
        Err(NetError::SizeMismatch { what: "input", got: 3, expected: 2 })
    ));
    assert!(matches!(
        session.run(&[1.0, 2.0], &[1.0, -1.0]),
        Err(NetError::SizeMismatch { what: "label", .. })
    ));
}
