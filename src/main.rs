// Trains a session on a synthetic 2-D dataset, one sample per run.
//
//   cargo run -- <request.json> [circle|xor|heart] [passes] [out.json]
//
// Run the library demos with `cargo run --example xor`.
use std::process;

use log::{error, info};

use linknet::data::synthetic;
use linknet::{BuildRequest, Dataset, Session};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(request_path) = args.get(1) else {
        eprintln!("usage: linknet <request.json> [circle|xor|heart] [passes] [out.json]");
        process::exit(2);
    };
    let dataset_name = args.get(2).map(String::as_str).unwrap_or("circle");
    let passes: usize = match args.get(3).map(|s| s.parse()) {
        None => 10,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("passes must be a non-negative integer: {e}");
            process::exit(2);
        }
    };

    let request = match BuildRequest::load_json(request_path) {
        Ok(r) => r,
        Err(e) => {
            error!("could not read {request_path}: {e}");
            process::exit(1);
        }
    };
    let mut session = match Session::build(&request) {
        Ok(s) => s,
        Err(e) => {
            error!("could not build session: {e}");
            process::exit(1);
        }
    };

    let data: Dataset = match dataset_name {
        "circle" => synthetic::circle(500, 0.0, 1),
        "xor" => synthetic::xor(500, 0.0, 1),
        "heart" => synthetic::heart(500, 0.0, 1),
        other => {
            eprintln!("unknown dataset {other:?}, expected circle, xor or heart");
            process::exit(2);
        }
    };

    for pass in 1..=passes {
        let mut total = 0.0;
        for (input, label) in data.iter() {
            match session.run(input, label) {
                Ok(report) => total += report.loss,
                Err(e) => {
                    error!("run failed: {e}");
                    process::exit(1);
                }
            }
        }
        info!("pass {pass}/{passes} mean_loss={:.6} epochs={}", total / data.len() as f64, session.epochs());
        println!("pass {pass:>3}  loss {:.6}", total / data.len() as f64);
    }

    if let Some(out) = args.get(4) {
        if let Err(e) = session.network().save_json(out) {
            error!("could not save network to {out}: {e}");
            process::exit(1);
        }
        println!("saved network to {out}");
    }
}
