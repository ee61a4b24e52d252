use linknet::{ActivationFunction, LossType, NetworkBuilder};

fn main() {
    env_logger::init();

    let mut network = NetworkBuilder::new(&[2, 4, 1], ActivationFunction::Tanh, ActivationFunction::Sigmoid)
        .seed(7)
        .build()
        .expect("valid shape");

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let learning_rate = 0.5;
    let epochs = 5000;

    for epoch in 0..epochs {
        let mut loss = 0.0;
        for (input, expected) in inputs.iter().zip(&expected_outputs) {
            network.forward(input).expect("input width 2");
            loss += network.loss(expected, LossType::Square).expect("label width 1");
            network.backward(expected, LossType::Square).expect("label width 1");
        }
        network.update(learning_rate);
        if epoch % 500 == 0 {
            println!("Epoch {epoch}: loss = {:.6}", loss / inputs.len() as f64);
        }
    }

    for input in &inputs {
        let output = network.forward(input).expect("input width 2")[0].output;
        println!("Input: {:?} -> Output: {:.4}", input, output);
    }
}
