use nih_plug::prelude::*;
use nih_plug_iced::IcedState;
use std::sync::Arc;

use crate::design::{FilterAlgorithm, DEFAULT_Q};
use crate::editor;

/// Ramp time for cutoff, Q and gain changes.
const SMOOTHING_MS: f32 = 10.0;

#[derive(Params)]
pub struct IirFiltersParams {
    #[persist = "editor-state"]
    pub editor_state: Arc<IcedState>,

    #[id = "type"]
    pub filter_type: EnumParam<FilterAlgorithm>,

    #[id = "cutoff"]
    pub cutoff: FloatParam,

    #[id = "q"]
    pub q: FloatParam,

    #[id = "gain"]
    pub gain: FloatParam,
}

impl Default for IirFiltersParams {
    fn default() -> Self {
        Self {
            editor_state: editor::default_state(),

            filter_type: EnumParam::new("Filter Type", FilterAlgorithm::Lpf2),

            cutoff: FloatParam::new(
                "Cutoff",
                1000.0,
                FloatRange::Skewed {
                    min: 20.0,
                    max: 20000.0,
                    factor: FloatRange::skew_factor(-2.0),
                },
            )
            .with_smoother(SmoothingStyle::Logarithmic(SMOOTHING_MS))
            .with_unit(" Hz")
            .with_value_to_string(formatters::v2s_f32_rounded(1)),

            q: FloatParam::new(
                "Q",
                DEFAULT_Q as f32,
                FloatRange::Linear {
                    min: 0.1,
                    max: 18.0,
                },
            )
            .with_smoother(SmoothingStyle::Linear(SMOOTHING_MS))
            .with_step_size(0.01)
            .with_value_to_string(formatters::v2s_f32_rounded(2)),

            gain: FloatParam::new(
                "Gain",
                0.0,
                FloatRange::Linear {
                    min: -24.0,
                    max: 24.0,
                },
            )
            .with_smoother(SmoothingStyle::Linear(SMOOTHING_MS))
            .with_step_size(0.1)
            .with_unit(" dB")
            .with_value_to_string(formatters::v2s_f32_rounded(1)),
        }
    }
}
