/// Logistic function: `F(x) = 1 / (1 + e^-x) == e^x / (1 + e^x)`.
pub fn logistic(x: f64) -> f64 {
    let ex = x.exp();
    ex / (1.0 + ex)
}

/// Derivative of the logistic function: `F(x) * (1 - F(x))`.
pub fn logistic_derivative(x: f64) -> f64 {
    let fx = logistic(x);
    fx * (1.0 - fx)
}
