use rand::Rng;
use serde::{Deserialize, Serialize};

/// 2D coordinate used only for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scatters a freshly created entity inside the default editor area.
    pub fn scattered<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { x: 400.0 + rng.random::<f64>() * 200.0, y: 300.0 + rng.random::<f64>() * 200.0 }
    }
}
