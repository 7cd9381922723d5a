use atomic_float::AtomicF32;
use nih_plug::prelude::*;
use std::sync::Arc;

pub mod biquad;
pub mod design;
pub mod filter;

mod editor;
mod params;

use filter::AudioFilter;
use params::IirFiltersParams;

/// The time it takes for the peak meter to decay by 12 dB after switching to complete silence.
const PEAK_METER_DECAY_MS: f64 = 150.0;

/// One filter per channel, mono or stereo.
const MAX_CHANNELS: usize = 2;

struct IirFilters {
    params: Arc<IirFiltersParams>,

    peak_meter_decay_weight: f32,
    /// Output level shown in the editor, stored as voltage gain.
    peak_meter: Arc<AtomicF32>,

    filters: [AudioFilter; MAX_CHANNELS],
}

impl Default for IirFilters {
    fn default() -> Self {
        Self {
            params: Arc::new(IirFiltersParams::default()),

            peak_meter_decay_weight: 1.0,
            peak_meter: Arc::new(AtomicF32::new(util::MINUS_INFINITY_DB)),

            filters: Default::default(),
        }
    }
}

impl IirFilters {
    /// Pushes the current (already smoothed) parameter values into every channel's filter. The
    /// filters only recompute their coefficients when something actually changed.
    fn push_parameters(&mut self, cutoff: f64, q: f64, gain_db: f64) {
        let algorithm = self.params.filter_type.value();
        for filter in self.filters.iter_mut() {
            filter.set_algorithm(algorithm);
            filter.set_cutoff(cutoff);
            filter.set_q(q);
            filter.set_gain_db(gain_db);
        }
    }
}

impl Plugin for IirFilters {
    const NAME: &'static str = "IIR Filters";
    const VENDOR: &'static str = "wpdsp";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn editor(&mut self, _async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        editor::create(
            self.params.clone(),
            self.peak_meter.clone(),
            self.params.editor_state.clone(),
        )
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let sample_rate = buffer_config.sample_rate as f64;
        let channels = audio_io_layout
            .main_output_channels
            .map(NonZeroU32::get)
            .unwrap_or(0);
        nih_log!("Initializing at {sample_rate} Hz with {channels} channel(s)");

        self.push_parameters(
            self.params.cutoff.value() as f64,
            self.params.q.value() as f64,
            self.params.gain.value() as f64,
        );
        for filter in self.filters.iter_mut() {
            filter.prepare(sample_rate);
        }

        // After `PEAK_METER_DECAY_MS` milliseconds of pure silence, the peak meter's value should
        // have dropped by 12 dB
        self.peak_meter_decay_weight = 0.25f64
            .powf((buffer_config.sample_rate as f64 * PEAK_METER_DECAY_MS / 1000.0).recip())
            as f32;

        true
    }

    fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let mut peak_amplitude = 0.0_f32;

        for mut channel_samples in buffer.iter_samples() {
            // Per-sample smoothing, the filters never see a parameter step
            let cutoff = self.params.cutoff.smoothed.next() as f64;
            let q = self.params.q.smoothed.next() as f64;
            let gain_db = self.params.gain.smoothed.next() as f64;
            self.push_parameters(cutoff, q, gain_db);

            for (filter, sample) in self.filters.iter_mut().zip(channel_samples.iter_mut()) {
                *sample = filter.process_sample(*sample as f64) as f32;
                peak_amplitude = peak_amplitude.max(sample.abs());
            }
        }

        if self.params.editor_state.is_open() {
            let current_peak_meter = self.peak_meter.load(std::sync::atomic::Ordering::Relaxed);
            let new_peak_meter = if peak_amplitude > current_peak_meter {
                peak_amplitude
            } else {
                current_peak_meter * self.peak_meter_decay_weight
                    + peak_amplitude * (1.0 - self.peak_meter_decay_weight)
            };

            self.peak_meter
                .store(new_peak_meter, std::sync::atomic::Ordering::Relaxed);
        }

        ProcessStatus::Normal
    }
}

impl ClapPlugin for IirFilters {
    const CLAP_ID: &'static str = "com.wpdsp.iir-filters";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Biquad filter with 29 selectable responses");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Filter,
        ClapFeature::Equalizer,
        ClapFeature::Stereo,
        ClapFeature::Mono,
    ];
}

impl Vst3Plugin for IirFilters {
    const VST3_CLASS_ID: [u8; 16] = *b"WpdspIirFilters1";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Filter, Vst3SubCategory::Eq];
}

nih_export_clap!(IirFilters);
nih_export_vst3!(IirFilters);
