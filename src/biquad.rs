use std::f64::consts::PI;

/// Biquad coefficients for
/// `y[n] = a0*x[n] + a1*x[n-1] + a2*x[n-2] - b1*y[n-1] - b2*y[n-2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub b1: f64,
    pub b2: f64,
}

impl Coefficients {
    pub const PASS_THROUGH: Self = Self {
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
        b1: 0.0,
        b2: 0.0,
    };

    /// Both poles strictly inside the unit circle (stability triangle).
    pub fn is_stable(&self) -> bool {
        self.b2.abs() < 1.0 && self.b1.abs() < 1.0 + self.b2
    }

    pub fn is_finite(&self) -> bool {
        [self.a0, self.a1, self.a2, self.b1, self.b2]
            .iter()
            .all(|c| c.is_finite())
    }

    /// Magnitude of the transfer function at normalized angular frequency `omega` (0..=PI).
    pub fn magnitude_at(&self, omega: f64) -> f64 {
        let (num_re, num_im) = self.eval(omega, self.a0, self.a1, self.a2);
        let (den_re, den_im) = self.eval(omega, 1.0, self.b1, self.b2);
        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }

    /// Complex transfer function value at `omega`, as (re, im).
    pub fn response_at(&self, omega: f64) -> (f64, f64) {
        let (nr, ni) = self.eval(omega, self.a0, self.a1, self.a2);
        let (dr, di) = self.eval(omega, 1.0, self.b1, self.b2);
        let d = dr * dr + di * di;
        ((nr * dr + ni * di) / d, (ni * dr - nr * di) / d)
    }

    // c0 + c1*z^-1 + c2*z^-2 on the unit circle
    fn eval(&self, omega: f64, c0: f64, c1: f64, c2: f64) -> (f64, f64) {
        let re = c0 + c1 * omega.cos() + c2 * (2.0 * omega).cos();
        let im = -c1 * omega.sin() - c2 * (2.0 * omega).sin();
        (re, im)
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::PASS_THROUGH
    }
}

/// Wet/dry blend applied around the biquad: `dry*x + wet*biquad(x)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mix {
    pub wet: f64,
    pub dry: f64,
}

impl Mix {
    pub const PASS_THROUGH: Self = Self { wet: 1.0, dry: 0.0 };
}

impl Default for Mix {
    fn default() -> Self {
        Self::PASS_THROUGH
    }
}

/// The four delay registers. What they hold depends on the structure in use.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DelayState {
    pub x_z1: f64,
    pub x_z2: f64,
    pub y_z1: f64,
    pub y_z2: f64,
}

/// Realization structure used to run the recurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BiquadStructure {
    #[default]
    Direct,
    Canonical,
    TransposeDirect,
    TransposeCanonical,
}

impl BiquadStructure {
    pub const ALL: [Self; 4] = [
        Self::Direct,
        Self::Canonical,
        Self::TransposeDirect,
        Self::TransposeCanonical,
    ];
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    coeffs: Coefficients,
    state: DelayState,
    structure: BiquadStructure,
}

impl Biquad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structure(structure: BiquadStructure) -> Self {
        Self {
            structure,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        self.state = DelayState::default();
    }

    /// Takes effect on the next sample; delay state is kept.
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        self.coeffs = coeffs;
    }

    pub fn set_structure(&mut self, structure: BiquadStructure) {
        self.structure = structure;
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coeffs
    }

    pub fn structure(&self) -> BiquadStructure {
        self.structure
    }

    pub fn state(&self) -> &DelayState {
        &self.state
    }

    pub fn process_sample(&mut self, x: f64) -> f64 {
        let c = &self.coeffs;
        let s = &mut self.state;

        match self.structure {
            BiquadStructure::Direct => {
                let y = c.a0 * x + c.a1 * s.x_z1 + c.a2 * s.x_z2 - c.b1 * s.y_z1 - c.b2 * s.y_z2;
                s.x_z2 = s.x_z1;
                s.x_z1 = x;
                s.y_z2 = s.y_z1;
                s.y_z1 = y;
                y
            }
            BiquadStructure::Canonical => {
                // x registers hold w[n-1], w[n-2]; y registers are unused
                let w = x - c.b1 * s.x_z1 - c.b2 * s.x_z2;
                let y = c.a0 * w + c.a1 * s.x_z1 + c.a2 * s.x_z2;
                s.x_z2 = s.x_z1;
                s.x_z1 = w;
                y
            }
            BiquadStructure::TransposeDirect => {
                // x registers accumulate feedback, y registers accumulate feed-forward
                let w = x + s.x_z1;
                let y = c.a0 * w + s.y_z1;
                s.x_z1 = s.x_z2 - c.b1 * w;
                s.x_z2 = -c.b2 * w;
                s.y_z1 = s.y_z2 + c.a1 * w;
                s.y_z2 = c.a2 * w;
                y
            }
            BiquadStructure::TransposeCanonical => {
                let y = c.a0 * x + s.x_z1;
                s.x_z1 = c.a1 * x - c.b1 * y + s.x_z2;
                s.x_z2 = c.a2 * x - c.b2 * y;
                y
            }
        }
    }
}

/// Normalized angular frequency for `freq_hz` at `sample_rate`.
pub fn omega(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * PI * freq_hz / sample_rate
}
