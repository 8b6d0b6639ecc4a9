use digit_nn::{BackpropRule, Network};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> digit_nn::Result<()> {
    let mut rng = StdRng::seed_from_u64(1);
    let mut network = Network::with_rng(2, 4, 1, 0.5, &mut rng)?.with_rule(BackpropRule::textbook());

    let inputs = [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
    let expected_outputs = [[0.99], [0.01], [0.99], [0.01]];

    let epochs = 20000;
    for epoch in 0..epochs {
        let mut loss = 0.0;
        for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
            let before = network.train_step(input, expected)?;
            loss += (expected[0] - before.output.get(0, 0)).powi(2);
        }
        if epoch % 2000 == 0 {
            println!("Epoch {epoch}: loss = {:.6}", loss / inputs.len() as f64);
        }
    }

    for input in &inputs {
        let output = network.predict(input)?.output.get(0, 0);
        println!("Input: {:?} -> Output: {:.4}", input, output);
    }
    Ok(())
}
