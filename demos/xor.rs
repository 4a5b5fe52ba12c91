use ferrite_mlp::{Network, Sample};
use rand::{rngs::StdRng, SeedableRng};

fn main() -> ferrite_mlp::Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut network = Network::new(&[2, 4, 2], &mut rng)?;

    // Class 1 when exactly one input is set.
    let samples = vec![
        Sample::new(vec![1.0, 0.0], vec![0.0, 1.0]),
        Sample::new(vec![1.0, 1.0], vec![1.0, 0.0]),
        Sample::new(vec![0.0, 1.0], vec![0.0, 1.0]),
        Sample::new(vec![0.0, 0.0], vec![1.0, 0.0]),
    ];

    for round in 0..10 {
        let summary = network.train(&samples, 500, 4, 2.0, Some(samples.as_slice()), &mut rng)?;
        if let Some(last) = summary.last() {
            println!("Round {round}: {last}  (loss = {:.6})", last.train_loss);
        }
    }

    for sample in &samples {
        let output = network.predict(&sample.input)?;
        println!("Input: {:?} -> Output: [{:.4}, {:.4}]", sample.input, output[0], output[1]);
    }
    Ok(())
}
