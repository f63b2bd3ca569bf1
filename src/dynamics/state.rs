use std::fmt;

use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Lorenz state: flow rate, temperature differential, vertical variation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub x: f64, // convective flow rate
    pub y: f64, // horizontal temperature differential
    pub z: f64, // vertical temperature variation
}

impl State {
    pub const ORIGIN: State = State { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Advance state by a derivative scaled by dt (one explicit Euler step).
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            x: self.x + d.dx * dt,
            y: self.y + d.dy * dt,
            z: self.z + d.dz * dt,
        }
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn distance(&self, other: &State) -> f64 {
        (self.as_vector() - other.as_vector()).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vector3<f64>> for State {
    fn from(v: Vector3<f64>) -> Self {
        State::new(v.x, v.y, v.z)
    }
}

impl From<[f64; 3]> for State {
    fn from([x, y, z]: [f64; 3]) -> Self {
        State::new(x, y, z)
    }
}

impl From<State> for [f64; 3] {
    fn from(s: State) -> Self {
        [s.x, s.y, s.z]
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// State derivative (dx/dt, dy/dt, dz/dt)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Deriv {
    pub fn norm(&self) -> f64 {
        Vector3::new(self.dx, self.dy, self.dz).norm()
    }
}
