//! Closed-form coefficient derivations for every supported filter response.
//!
//! Each algorithm maps `(cutoff, Q, gain, sample rate)` to a biquad coefficient set and a
//! wet/dry mix. Shelving and non-constant-Q EQ are expressed as a correction summed onto the
//! dry signal (`wet = mu - 1`, `dry = 1`).

use nih_plug::prelude::Enum;
use std::f64::consts::{PI, SQRT_2};

use crate::biquad::{omega, Coefficients, Mix};

/// Q used whenever a non-positive Q is requested.
pub const DEFAULT_Q: f64 = 0.707;

/// Tangent arguments are kept below this to stay clear of the asymptote at PI/2.
pub const MAX_TAN_ARG: f64 = 0.95 * PI / 2.0;

pub const MIN_CUTOFF_HZ: f64 = 1.0;
/// Highest cutoff as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f64 = 0.49;

/// Upper bound on the damping ratio of the second-order impulse-invariant design, which needs
/// complex poles.
const MAX_IMPULSE_INVARIANT_DAMPING: f64 = 0.999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum FilterAlgorithm {
    #[id = "lpf1p"]
    #[name = "LPF1P"]
    Lpf1P,
    #[id = "lpf1"]
    #[name = "LPF1"]
    Lpf1,
    #[id = "hpf1"]
    #[name = "HPF1"]
    Hpf1,
    #[id = "lpf2"]
    #[name = "LPF2"]
    Lpf2,
    #[id = "hpf2"]
    #[name = "HPF2"]
    Hpf2,
    #[id = "bpf2"]
    #[name = "BPF2"]
    Bpf2,
    #[id = "bsf2"]
    #[name = "BSF2"]
    Bsf2,
    #[id = "butter_lpf2"]
    #[name = "ButterLPF2"]
    ButterLpf2,
    #[id = "butter_hpf2"]
    #[name = "ButterHPF2"]
    ButterHpf2,
    #[id = "butter_bpf2"]
    #[name = "ButterBPF2"]
    ButterBpf2,
    #[id = "butter_bsf2"]
    #[name = "ButterBSF2"]
    ButterBsf2,
    #[id = "mma_lpf2"]
    #[name = "MMALPF2"]
    MmaLpf2,
    #[id = "mma_lpf2b"]
    #[name = "MMALPF2B"]
    MmaLpf2B,
    #[id = "low_shelf"]
    #[name = "LowShelf"]
    LowShelf,
    #[id = "hi_shelf"]
    #[name = "HiShelf"]
    HiShelf,
    #[id = "ncq_para_eq"]
    #[name = "NCQParaEQ"]
    NcqParaEq,
    #[id = "cq_para_eq"]
    #[name = "CQParaEQ"]
    CqParaEq,
    #[id = "lwr_lpf2"]
    #[name = "LWRLPF2"]
    LwrLpf2,
    #[id = "lwr_hpf2"]
    #[name = "LWRHPF2"]
    LwrHpf2,
    #[id = "apf1"]
    #[name = "APF1"]
    Apf1,
    #[id = "apf2"]
    #[name = "APF2"]
    Apf2,
    #[id = "reson_a"]
    #[name = "ResonA"]
    ResonA,
    #[id = "reson_b"]
    #[name = "ResonB"]
    ResonB,
    #[id = "match_lp2a"]
    #[name = "MatchLP2A"]
    MatchLp2A,
    #[id = "match_lp2b"]
    #[name = "MatchLP2B"]
    MatchLp2B,
    #[id = "match_bp2a"]
    #[name = "MatchBP2A"]
    MatchBp2A,
    #[id = "match_bp2b"]
    #[name = "MatchBP2B"]
    MatchBp2B,
    #[id = "imp_inv_lp1"]
    #[name = "ImpInvLP1"]
    ImpInvLp1,
    #[id = "imp_inv_lp2"]
    #[name = "ImpInvLP2"]
    ImpInvLp2,
}

impl FilterAlgorithm {
    /// All algorithms, in host choice order.
    pub const ALL: [Self; 29] = [
        Self::Lpf1P,
        Self::Lpf1,
        Self::Hpf1,
        Self::Lpf2,
        Self::Hpf2,
        Self::Bpf2,
        Self::Bsf2,
        Self::ButterLpf2,
        Self::ButterHpf2,
        Self::ButterBpf2,
        Self::ButterBsf2,
        Self::MmaLpf2,
        Self::MmaLpf2B,
        Self::LowShelf,
        Self::HiShelf,
        Self::NcqParaEq,
        Self::CqParaEq,
        Self::LwrLpf2,
        Self::LwrHpf2,
        Self::Apf1,
        Self::Apf2,
        Self::ResonA,
        Self::ResonB,
        Self::MatchLp2A,
        Self::MatchLp2B,
        Self::MatchBp2A,
        Self::MatchBp2B,
        Self::ImpInvLp1,
        Self::ImpInvLp2,
    ];

    /// Maps a raw host selector to an algorithm. Anything out of range is `None`.
    pub fn from_choice(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_low_pass(self) -> bool {
        matches!(
            self,
            Self::Lpf1P
                | Self::Lpf1
                | Self::Lpf2
                | Self::ButterLpf2
                | Self::MmaLpf2
                | Self::MmaLpf2B
                | Self::LwrLpf2
                | Self::MatchLp2A
                | Self::MatchLp2B
                | Self::ImpInvLp1
                | Self::ImpInvLp2
        )
    }

    /// Whether the gain parameter affects this response.
    pub fn uses_gain(self) -> bool {
        matches!(
            self,
            Self::LowShelf | Self::HiShelf | Self::NcqParaEq | Self::CqParaEq
        )
    }

    /// Derives the coefficients for `params`. Without a usable sample rate the result is
    /// pass-through.
    pub fn design(self, params: &DesignParams) -> FilterDesign {
        if !(params.sample_rate > 0.0 && params.sample_rate.is_finite()) {
            return FilterDesign::PASS_THROUGH;
        }
        let p = params.sanitized();
        match self {
            Self::Lpf1P => lpf1p(&p),
            Self::Lpf1 => lpf1(&p),
            Self::Hpf1 => hpf1(&p),
            Self::Lpf2 => lpf2(&p),
            Self::Hpf2 => hpf2(&p),
            Self::Bpf2 => bpf2(&p),
            Self::Bsf2 => bsf2(&p),
            Self::ButterLpf2 => butter_lpf2(&p),
            Self::ButterHpf2 => butter_hpf2(&p),
            Self::ButterBpf2 => butter_bpf2(&p),
            Self::ButterBsf2 => butter_bsf2(&p),
            Self::MmaLpf2 => mma_lpf2(&p),
            Self::MmaLpf2B => mma_lpf2b(&p),
            Self::LowShelf => low_shelf(&p),
            Self::HiShelf => hi_shelf(&p),
            Self::NcqParaEq => ncq_para_eq(&p),
            Self::CqParaEq => cq_para_eq(&p),
            Self::LwrLpf2 => lwr_lpf2(&p),
            Self::LwrHpf2 => lwr_hpf2(&p),
            Self::Apf1 => apf1(&p),
            Self::Apf2 => apf2(&p),
            Self::ResonA => reson_a(&p),
            Self::ResonB => reson_b(&p),
            Self::MatchLp2A => match_lp2a(&p),
            Self::MatchLp2B => match_lp2b(&p),
            Self::MatchBp2A => match_bp2a(&p),
            Self::MatchBp2B => match_bp2b(&p),
            Self::ImpInvLp1 => imp_inv_lp1(&p),
            Self::ImpInvLp2 => imp_inv_lp2(&p),
        }
    }
}

/// Musical parameters feeding a derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignParams {
    pub cutoff: f64,
    pub q: f64,
    pub gain_db: f64,
    pub sample_rate: f64,
}

impl DesignParams {
    /// Q substituted when non-positive, cutoff clamped into `[MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO * fs]`.
    fn sanitized(&self) -> Self {
        let q = if self.q > 0.0 { self.q } else { DEFAULT_Q };
        let max_cutoff = (self.sample_rate * MAX_CUTOFF_RATIO).max(MIN_CUTOFF_HZ);
        let cutoff = if self.cutoff.is_nan() {
            MIN_CUTOFF_HZ
        } else {
            self.cutoff.clamp(MIN_CUTOFF_HZ, max_cutoff)
        };
        Self {
            cutoff,
            q,
            gain_db: self.gain_db,
            sample_rate: self.sample_rate,
        }
    }

    fn theta(&self) -> f64 {
        omega(self.cutoff, self.sample_rate)
    }

    /// Linear gain `10^(gain_db / 20)`.
    fn mu(&self) -> f64 {
        10f64.powf(self.gain_db / 20.0)
    }
}

/// Coefficients plus the wet/dry mix they are meant to be run with.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterDesign {
    pub coefficients: Coefficients,
    pub mix: Mix,
}

impl FilterDesign {
    pub const PASS_THROUGH: Self = Self {
        coefficients: Coefficients::PASS_THROUGH,
        mix: Mix::PASS_THROUGH,
    };

    fn filtered(coefficients: Coefficients) -> Self {
        Self {
            coefficients,
            mix: Mix::PASS_THROUGH,
        }
    }

    fn correction(coefficients: Coefficients, mu: f64) -> Self {
        Self {
            coefficients,
            mix: Mix {
                wet: mu - 1.0,
                dry: 1.0,
            },
        }
    }

    /// Magnitude of `dry + wet * H` at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let (re, im) = self.coefficients.response_at(omega(freq_hz, sample_rate));
        let re = self.mix.dry + self.mix.wet * re;
        let im = self.mix.wet * im;
        (re * re + im * im).sqrt()
    }
}

fn clamp_tan_arg(arg: f64) -> f64 {
    arg.min(MAX_TAN_ARG)
}

fn lpf1p(p: &DesignParams) -> FilterDesign {
    let gamma = 2.0 - p.theta().cos();
    let b1 = (gamma * gamma - 1.0).sqrt() - gamma;
    FilterDesign::filtered(Coefficients {
        a0: 1.0 + b1,
        a1: 0.0,
        a2: 0.0,
        b1,
        b2: 0.0,
    })
}

fn lpf1(p: &DesignParams) -> FilterDesign {
    let theta = p.theta();
    let gamma = theta.cos() / (1.0 + theta.sin());
    FilterDesign::filtered(Coefficients {
        a0: (1.0 - gamma) / 2.0,
        a1: (1.0 - gamma) / 2.0,
        a2: 0.0,
        b1: -gamma,
        b2: 0.0,
    })
}

fn hpf1(p: &DesignParams) -> FilterDesign {
    let theta = p.theta();
    let gamma = theta.cos() / (1.0 + theta.sin());
    FilterDesign::filtered(Coefficients {
        a0: (1.0 + gamma) / 2.0,
        a1: -(1.0 + gamma) / 2.0,
        a2: 0.0,
        b1: -gamma,
        b2: 0.0,
    })
}

/// beta and gamma shared by the second-order bilinear low/high pass.
fn second_order_beta_gamma(p: &DesignParams) -> (f64, f64) {
    let theta = p.theta();
    let half_d_sin = (1.0 / p.q) / 2.0 * theta.sin();
    let beta = 0.5 * (1.0 - half_d_sin) / (1.0 + half_d_sin);
    let gamma = (0.5 + beta) * theta.cos();
    (beta, gamma)
}

fn lpf2(p: &DesignParams) -> FilterDesign {
    let (beta, gamma) = second_order_beta_gamma(p);
    let alpha = (0.5 + beta - gamma) / 2.0;
    FilterDesign::filtered(Coefficients {
        a0: alpha,
        a1: 2.0 * alpha,
        a2: alpha,
        b1: -2.0 * gamma,
        b2: 2.0 * beta,
    })
}

fn hpf2(p: &DesignParams) -> FilterDesign {
    let (beta, gamma) = second_order_beta_gamma(p);
    let alpha = (0.5 + beta + gamma) / 2.0;
    FilterDesign::filtered(Coefficients {
        a0: alpha,
        a1: -2.0 * alpha,
        a2: alpha,
        b1: -2.0 * gamma,
        b2: 2.0 * beta,
    })
}

fn bpf2(p: &DesignParams) -> FilterDesign {
    let k = clamp_tan_arg(PI * p.cutoff / p.sample_rate).tan();
    let q = p.q;
    let delta = k * k * q + k + q;
    FilterDesign::filtered(Coefficients {
        a0: k / delta,
        a1: 0.0,
        a2: -k / delta,
        b1: 2.0 * q * (k * k - 1.0) / delta,
        b2: (k * k * q - k + q) / delta,
    })
}

fn bsf2(p: &DesignParams) -> FilterDesign {
    let k = clamp_tan_arg(PI * p.cutoff / p.sample_rate).tan();
    let q = p.q;
    let delta = k * k * q + k + q;
    FilterDesign::filtered(Coefficients {
        a0: q * (1.0 + k * k) / delta,
        a1: 2.0 * q * (k * k - 1.0) / delta,
        a2: q * (1.0 + k * k) / delta,
        b1: 2.0 * q * (k * k - 1.0) / delta,
        b2: (k * k * q - k + q) / delta,
    })
}

fn butter_lpf2(p: &DesignParams) -> FilterDesign {
    let c = 1.0 / clamp_tan_arg(PI * p.cutoff / p.sample_rate).tan();
    let a0 = 1.0 / (1.0 + SQRT_2 * c + c * c);
    FilterDesign::filtered(Coefficients {
        a0,
        a1: 2.0 * a0,
        a2: a0,
        b1: 2.0 * a0 * (1.0 - c * c),
        b2: a0 * (1.0 - SQRT_2 * c + c * c),
    })
}

fn butter_hpf2(p: &DesignParams) -> FilterDesign {
    let c = clamp_tan_arg(PI * p.cutoff / p.sample_rate).tan();
    let a0 = 1.0 / (1.0 + SQRT_2 * c + c * c);
    FilterDesign::filtered(Coefficients {
        a0,
        a1: -2.0 * a0,
        a2: a0,
        b1: 2.0 * a0 * (c * c - 1.0),
        b2: a0 * (1.0 - SQRT_2 * c + c * c),
    })
}

/// Half-bandwidth angle `PI * (fc / Q) / fs`, clamped.
fn bandwidth_angle(p: &DesignParams) -> f64 {
    clamp_tan_arg(PI * (p.cutoff / p.q) / p.sample_rate)
}

fn butter_bpf2(p: &DesignParams) -> FilterDesign {
    let c = 1.0 / bandwidth_angle(p).tan();
    let d = 2.0 * p.theta().cos();
    let a0 = 1.0 / (1.0 + c);
    FilterDesign::filtered(Coefficients {
        a0,
        a1: 0.0,
        a2: -a0,
        b1: -a0 * (c * d),
        b2: a0 * (c - 1.0),
    })
}

fn butter_bsf2(p: &DesignParams) -> FilterDesign {
    let c = bandwidth_angle(p).tan();
    let d = 2.0 * p.theta().cos();
    let a0 = 1.0 / (1.0 + c);
    FilterDesign::filtered(Coefficients {
        a0,
        a1: -a0 * d,
        a2: a0,
        b1: -a0 * d,
        b2: a0 * (1.0 - c),
    })
}

/// Massberg-style analog-matched low pass. `gain_compensated` pulls the passband down as the
/// resonant peak grows.
fn mma_lowpass(p: &DesignParams, gain_compensated: bool) -> FilterDesign {
    let theta = p.theta();
    let q = p.q;
    let resonance_db = if q > DEFAULT_Q {
        let peak = q * q / (q * q - 0.25).sqrt();
        20.0 * peak.log10()
    } else {
        0.0
    };

    let resonance = (theta.cos()
        + theta.sin() * (10f64.powf(resonance_db / 10.0) - 1.0).max(0.0).sqrt())
        / (10f64.powf(resonance_db / 20.0) * theta.sin() + 1.0);
    let g = if gain_compensated {
        10f64.powf(-resonance_db / 40.0)
    } else {
        1.0
    };

    let b1 = -2.0 * resonance * theta.cos();
    let b2 = resonance * resonance;
    FilterDesign::filtered(Coefficients {
        a0: g * (1.0 + b1 + b2),
        a1: 0.0,
        a2: 0.0,
        b1,
        b2,
    })
}

fn mma_lpf2(p: &DesignParams) -> FilterDesign {
    mma_lowpass(p, true)
}

fn mma_lpf2b(p: &DesignParams) -> FilterDesign {
    mma_lowpass(p, false)
}

fn low_shelf(p: &DesignParams) -> FilterDesign {
    let mu = p.mu();
    let beta = 4.0 / (1.0 + mu);
    let delta = beta * clamp_tan_arg(p.theta() / 2.0).tan();
    let gamma = (1.0 - delta) / (1.0 + delta);
    FilterDesign::correction(
        Coefficients {
            a0: (1.0 - gamma) / 2.0,
            a1: (1.0 - gamma) / 2.0,
            a2: 0.0,
            b1: -gamma,
            b2: 0.0,
        },
        mu,
    )
}

fn hi_shelf(p: &DesignParams) -> FilterDesign {
    let mu = p.mu();
    let beta = (1.0 + mu) / 4.0;
    let delta = beta * clamp_tan_arg(p.theta() / 2.0).tan();
    let gamma = (1.0 - delta) / (1.0 + delta);
    let a0 = (1.0 + gamma) / 2.0;
    FilterDesign::correction(
        Coefficients {
            a0,
            a1: -a0,
            a2: 0.0,
            b1: -gamma,
            b2: 0.0,
        },
        mu,
    )
}

fn ncq_para_eq(p: &DesignParams) -> FilterDesign {
    let theta = p.theta();
    let mu = p.mu();
    let tan_arg = clamp_tan_arg(theta / (2.0 * p.q)).tan();

    let zeta = 4.0 / (1.0 + mu);
    let beta = 0.5 * (1.0 - zeta * tan_arg) / (1.0 + zeta * tan_arg);
    let gamma = (0.5 + beta) * theta.cos();
    let alpha = 0.5 - beta;
    FilterDesign::correction(
        Coefficients {
            a0: alpha,
            a1: 0.0,
            a2: -alpha,
            b1: -2.0 * gamma,
            b2: 2.0 * beta,
        },
        mu,
    )
}

fn cq_para_eq(p: &DesignParams) -> FilterDesign {
    let k = clamp_tan_arg(PI * p.cutoff / p.sample_rate).tan();
    let vo = p.mu();
    let q = p.q;

    let d0 = 1.0 + k / q + k * k;
    let e0 = 1.0 + k / (vo * q) + k * k;
    let alpha = 1.0 + (vo / q) * k + k * k;
    let beta = 2.0 * (k * k - 1.0);
    let gamma = 1.0 - (vo / q) * k + k * k;
    let delta = 1.0 - k / q + k * k;
    let eta = 1.0 - k / (vo * q) + k * k;

    let coefficients = if p.gain_db >= 0.0 {
        Coefficients {
            a0: alpha / d0,
            a1: beta / d0,
            a2: gamma / d0,
            b1: beta / d0,
            b2: delta / d0,
        }
    } else {
        Coefficients {
            a0: d0 / e0,
            a1: beta / e0,
            a2: delta / e0,
            b1: beta / e0,
            b2: eta / e0,
        }
    };
    FilterDesign::filtered(coefficients)
}

/// Linkwitz-Riley: returns `(omega_c, k, denominator, b1, b2)`.
fn linkwitz_riley_poles(p: &DesignParams) -> (f64, f64, f64, f64, f64) {
    let omega_c = PI * p.cutoff;
    let k = omega_c / clamp_tan_arg(PI * p.cutoff / p.sample_rate).tan();
    let denominator = k * k + omega_c * omega_c + 2.0 * k * omega_c;
    let b1 = (-2.0 * k * k + 2.0 * omega_c * omega_c) / denominator;
    let b2 = (-2.0 * k * omega_c + k * k + omega_c * omega_c) / denominator;
    (omega_c, k, denominator, b1, b2)
}

fn lwr_lpf2(p: &DesignParams) -> FilterDesign {
    let (omega_c, _, denominator, b1, b2) = linkwitz_riley_poles(p);
    let a0 = omega_c * omega_c / denominator;
    FilterDesign::filtered(Coefficients {
        a0,
        a1: 2.0 * omega_c * omega_c / denominator,
        a2: a0,
        b1,
        b2,
    })
}

fn lwr_hpf2(p: &DesignParams) -> FilterDesign {
    let (_, k, denominator, b1, b2) = linkwitz_riley_poles(p);
    let a0 = k * k / denominator;
    FilterDesign::filtered(Coefficients {
        a0,
        a1: -2.0 * k * k / denominator,
        a2: a0,
        b1,
        b2,
    })
}

fn apf1(p: &DesignParams) -> FilterDesign {
    let t = clamp_tan_arg(PI * p.cutoff / p.sample_rate).tan();
    let alpha = (t - 1.0) / (t + 1.0);
    FilterDesign::filtered(Coefficients {
        a0: alpha,
        a1: 1.0,
        a2: 0.0,
        b1: alpha,
        b2: 0.0,
    })
}

fn apf2(p: &DesignParams) -> FilterDesign {
    let t = bandwidth_angle(p).tan();
    let alpha = (t - 1.0) / (t + 1.0);
    let beta = -p.theta().cos();
    FilterDesign::filtered(Coefficients {
        a0: -alpha,
        a1: beta * (1.0 - alpha),
        a2: 1.0,
        b1: beta * (1.0 - alpha),
        b2: -alpha,
    })
}

/// Resonator pole pair from the bandwidth `fc / Q`: returns `(b1, b2)`.
fn resonator_poles(p: &DesignParams) -> (f64, f64) {
    let bandwidth = p.cutoff / p.q;
    let b2 = (-2.0 * PI * (bandwidth / p.sample_rate)).exp();
    let b1 = (-4.0 * b2 / (1.0 + b2)) * p.theta().cos();
    (b1, b2)
}

fn reson_a(p: &DesignParams) -> FilterDesign {
    let (b1, b2) = resonator_poles(p);
    // b1^2 / (4 b2), expanded so b2 underflowing to zero stays finite
    let cos_theta = p.theta().cos();
    let ratio = 4.0 * b2 * cos_theta * cos_theta / ((1.0 + b2) * (1.0 + b2));
    let a0 = (1.0 - b2) * (1.0 - ratio).max(0.0).sqrt();
    FilterDesign::filtered(Coefficients {
        a0,
        a1: 0.0,
        a2: 0.0,
        b1,
        b2,
    })
}

fn reson_b(p: &DesignParams) -> FilterDesign {
    let (b1, b2) = resonator_poles(p);
    let a0 = 1.0 - b2.sqrt();
    FilterDesign::filtered(Coefficients {
        a0,
        a1: 0.0,
        a2: -a0,
        b1,
        b2,
    })
}

/// Impulse-invariant pole pair used by the matched fits: returns `(b1, b2)`.
///
/// Underdamped (`q <= 1`) poles are complex and use `cos`. Overdamped poles are real and the
/// `e^{-qθ}·cosh(rθ)` term is summed as its two exponentials, which stays finite for tiny Q.
fn matched_poles(theta: f64, q_factor: f64) -> (f64, f64) {
    let q = 1.0 / (2.0 * q_factor);
    let b2 = (-2.0 * q * theta).exp();
    let b1 = if q <= 1.0 {
        -2.0 * (-q * theta).exp() * ((1.0 - q * q).sqrt() * theta).cos()
    } else {
        // q - r == 1 / (q + r), without the cancellation
        let sum = q + (q * q - 1.0).sqrt();
        -((-theta / sum).exp() + (-sum * theta).exp())
    };
    (b1, b2)
}

/// Squared-magnitude basis used by the tight fits: returns `(B0, B1, B2, phi0, phi1, phi2)`.
fn tight_fit_basis(theta: f64, b1: f64, b2: f64) -> (f64, f64, f64, f64, f64, f64) {
    let big_b0 = (1.0 + b1 + b2) * (1.0 + b1 + b2);
    let big_b1 = (1.0 - b1 + b2) * (1.0 - b1 + b2);
    let big_b2 = -4.0 * b2;

    let s = (theta / 2.0).sin();
    let phi1 = s * s;
    let phi0 = 1.0 - phi1;
    let phi2 = 4.0 * phi0 * phi1;
    (big_b0, big_b1, big_b2, phi0, phi1, phi2)
}

/// `sqrt((1 - f0^2)^2 + f0^2 / Q^2)` for the loose fits, `f0` being the cutoff as a fraction of
/// Nyquist.
fn loose_fit_norm(f0: f64, q: f64) -> f64 {
    ((1.0 - f0 * f0) * (1.0 - f0 * f0) + (f0 * f0) / (q * q)).sqrt()
}

fn match_lp2a(p: &DesignParams) -> FilterDesign {
    let theta = p.theta();
    let (b1, b2) = matched_poles(theta, p.q);
    let (big_b0, big_b1, big_b2, phi0, phi1, phi2) = tight_fit_basis(theta, b1, b2);

    let r1 = (big_b0 * phi0 + big_b1 * phi1 + big_b2 * phi2) * (p.q * p.q);
    let big_a0 = big_b0.max(0.0);
    let big_a1 = ((r1 - big_a0 * phi0) / phi1).max(0.0);

    let a0 = 0.5 * (big_a0.sqrt() + big_a1.sqrt());
    let a1 = big_a0.sqrt() - a0;
    FilterDesign::filtered(Coefficients {
        a0,
        a1,
        a2: 0.0,
        b1,
        b2,
    })
}

fn match_lp2b(p: &DesignParams) -> FilterDesign {
    let theta = p.theta();
    let (b1, b2) = matched_poles(theta, p.q);
    let f0 = theta / PI;

    let r0 = 1.0 + b1 + b2;
    let r1 = (1.0 - b1 + b2) * f0 * f0 / loose_fit_norm(f0, p.q);

    let a0 = (r0 + r1) / 2.0;
    FilterDesign::filtered(Coefficients {
        a0,
        a1: r0 - a0,
        a2: 0.0,
        b1,
        b2,
    })
}

fn match_bp2a(p: &DesignParams) -> FilterDesign {
    let theta = p.theta();
    let (b1, b2) = matched_poles(theta, p.q);
    let (big_b0, big_b1, big_b2, phi0, phi1, phi2) = tight_fit_basis(theta, b1, b2);

    let r1 = big_b0 * phi0 + big_b1 * phi1 + big_b2 * phi2;
    let r2 = -big_b0 + big_b1 + 4.0 * (phi0 - phi1) * big_b2;

    let big_a2 = (r1 - r2 * phi1) / (4.0 * phi1 * phi1);
    let big_a1 = r2 + 4.0 * (phi1 - phi0) * big_a2;

    let a1 = -0.5 * big_a1.max(0.0).sqrt();
    let a0 = 0.5 * ((big_a2 + a1 * a1).max(0.0).sqrt() - a1);
    FilterDesign::filtered(Coefficients {
        a0,
        a1,
        a2: -a0 - a1,
        b1,
        b2,
    })
}

fn match_bp2b(p: &DesignParams) -> FilterDesign {
    let theta = p.theta();
    let (b1, b2) = matched_poles(theta, p.q);
    let f0 = theta / PI;

    let r0 = (1.0 + b1 + b2) / (PI * f0 * p.q);
    let r1 = (1.0 - b1 + b2) * (f0 / p.q) / loose_fit_norm(f0, p.q);

    let a1 = -r1 / 2.0;
    let a0 = (r0 - a1) / 2.0;
    FilterDesign::filtered(Coefficients {
        a0,
        a1,
        a2: -a0 - a1,
        b1,
        b2,
    })
}

fn imp_inv_lp1(p: &DesignParams) -> FilterDesign {
    let e_t = (-p.theta()).exp();
    FilterDesign::filtered(Coefficients {
        a0: 1.0 - e_t,
        a1: 0.0,
        a2: 0.0,
        b1: -e_t,
        b2: 0.0,
    })
}

fn imp_inv_lp2(p: &DesignParams) -> FilterDesign {
    let alpha = p.theta();
    let zeta = (1.0 / (2.0 * p.q)).min(MAX_IMPULSE_INVARIANT_DAMPING);
    let damped = (1.0 - zeta * zeta).sqrt();

    // pole p = p_re + j*p_im, residue c = j*c_im (scaled by T)
    let p_re = -alpha * zeta;
    let p_im = alpha * damped;
    let c_im = -alpha / (2.0 * damped);

    let decay = p_re.exp();
    FilterDesign::filtered(Coefficients {
        a0: 0.0,
        a1: -2.0 * c_im * p_im.sin() * decay,
        a2: 0.0,
        b1: -2.0 * decay * p_im.cos(),
        b2: decay * decay,
    })
}
