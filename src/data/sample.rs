use crate::math::vector::argmax;

/// One labeled example: an input vector and its (one-hot) target.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Sample {
        Sample { input, target }
    }

    /// Class index encoded by the target.
    pub fn label(&self) -> usize {
        argmax(&self.target)
    }
}
