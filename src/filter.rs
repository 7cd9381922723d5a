use nih_plug::prelude::*;

use crate::biquad::{Biquad, BiquadStructure};
use crate::design::{DesignParams, FilterAlgorithm, FilterDesign, DEFAULT_Q};

/// One channel's filter: musical parameters, the design they produce, and the biquad running it.
///
/// Setters only mark the design stale. The design is recomputed at most once per sample, right
/// before the next sample is processed.
#[derive(Debug, Clone)]
pub struct AudioFilter {
    biquad: Biquad,
    design: FilterDesign,

    algorithm: Option<FilterAlgorithm>,
    cutoff: f64,
    q: f64,
    gain_db: f64,
    sample_rate: f64,

    dirty: bool,
}

impl Default for AudioFilter {
    fn default() -> Self {
        Self {
            biquad: Biquad::new(),
            design: FilterDesign::PASS_THROUGH,
            algorithm: None,
            cutoff: 1000.0,
            q: DEFAULT_Q,
            gain_db: 0.0,
            sample_rate: 0.0,
            dirty: false,
        }
    }
}

impl AudioFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structure(structure: BiquadStructure) -> Self {
        Self {
            biquad: Biquad::with_structure(structure),
            ..Self::default()
        }
    }

    /// Sets the sample rate, clears the delay state and recomputes the design immediately. A
    /// non-positive rate leaves the filter passing audio through unchanged.
    pub fn prepare(&mut self, sample_rate: f64) {
        if sample_rate <= 0.0 {
            nih_log!("Filter prepared with invalid sample rate {sample_rate}, passing through");
        }
        self.sample_rate = sample_rate;
        self.biquad.reset();
        self.recalculate();
    }

    /// Clears the delay state. Parameters and coefficients are kept.
    pub fn reset(&mut self) {
        self.biquad.reset();
    }

    pub fn set_algorithm(&mut self, algorithm: FilterAlgorithm) {
        self.update_algorithm(Some(algorithm));
    }

    /// Raw host selector. Out-of-range values select the pass-through design.
    pub fn set_algorithm_index(&mut self, index: usize) {
        self.update_algorithm(FilterAlgorithm::from_choice(index));
    }

    pub fn set_cutoff(&mut self, hz: f64) {
        if self.cutoff != hz {
            self.cutoff = hz;
            self.dirty = true;
        }
    }

    /// Non-positive values are replaced with [`DEFAULT_Q`].
    pub fn set_q(&mut self, q: f64) {
        let q = if q > 0.0 { q } else { DEFAULT_Q };
        if self.q != q {
            self.q = q;
            self.dirty = true;
        }
    }

    pub fn set_gain_db(&mut self, gain_db: f64) {
        if self.gain_db != gain_db {
            self.gain_db = gain_db;
            self.dirty = true;
        }
    }

    pub fn set_structure(&mut self, structure: BiquadStructure) {
        self.biquad.set_structure(structure);
    }

    pub fn process_sample(&mut self, x: f64) -> f64 {
        if self.dirty {
            self.recalculate();
        }

        let mix = self.design.mix;
        let y = mix.dry * x + mix.wet * self.biquad.process_sample(x);
        nih_debug_assert!(y.is_finite() || !x.is_finite());
        y
    }

    pub fn algorithm(&self) -> Option<FilterAlgorithm> {
        self.algorithm
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn structure(&self) -> BiquadStructure {
        self.biquad.structure()
    }

    /// The design currently installed in the biquad. Pending parameter changes are not reflected
    /// until the next processed sample.
    pub fn design(&self) -> &FilterDesign {
        &self.design
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn update_algorithm(&mut self, algorithm: Option<FilterAlgorithm>) {
        if self.algorithm != algorithm {
            self.algorithm = algorithm;
            self.dirty = true;
        }
    }

    fn recalculate(&mut self) {
        self.dirty = false;

        self.design = match self.algorithm {
            Some(algorithm) if self.sample_rate > 0.0 => algorithm.design(&DesignParams {
                cutoff: self.cutoff,
                q: self.q,
                gain_db: self.gain_db,
                sample_rate: self.sample_rate,
            }),
            _ => FilterDesign::PASS_THROUGH,
        };
        self.biquad.set_coefficients(self.design.coefficients);
    }
}
