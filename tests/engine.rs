//! End-to-end behaviour of the filter engine: designer + biquad core driven sample by sample.

use biquad::{Biquad as _, Coefficients as RbjCoefficients, DirectForm1, ToHertz, Type};
use iir_filters::biquad::{Biquad, BiquadStructure};
use iir_filters::design::{DesignParams, FilterAlgorithm, DEFAULT_Q};
use iir_filters::filter::AudioFilter;

const SR: f64 = 48000.0;

fn filter_for(
    algorithm: FilterAlgorithm,
    sample_rate: f64,
    cutoff: f64,
    q: f64,
    gain_db: f64,
) -> AudioFilter {
    let mut filter = AudioFilter::new();
    filter.set_algorithm(algorithm);
    filter.set_cutoff(cutoff);
    filter.set_q(q);
    filter.set_gain_db(gain_db);
    filter.prepare(sample_rate);
    filter
}

fn impulse_response(filter: &mut AudioFilter, len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| filter.process_sample(if n == 0 { 1.0 } else { 0.0 }))
        .collect()
}

#[test]
fn every_algorithm_is_stable_across_the_band() {
    for algorithm in FilterAlgorithm::ALL {
        for i in 1..200 {
            let cutoff = i as f64 / 200.0 * SR / 2.0;
            let design = algorithm.design(&DesignParams {
                cutoff,
                q: DEFAULT_Q,
                gain_db: 0.0,
                sample_rate: SR,
            });
            assert!(
                design.coefficients.is_stable(),
                "{algorithm:?} has a pole on or outside the unit circle at {cutoff} Hz: {:?}",
                design.coefficients
            );
        }
    }
}

#[test]
fn unselected_algorithm_passes_signal_unchanged() {
    let mut filter = AudioFilter::new();
    filter.prepare(SR);
    let input: Vec<f64> = (0..256).map(|n| (n as f64 * 0.113).sin() * 0.8).collect();
    for &x in &input {
        assert_eq!(filter.process_sample(x), x);
    }

    let mut filter = AudioFilter::new();
    filter.set_algorithm_index(1000);
    filter.prepare(SR);
    for &x in &input {
        assert_eq!(filter.process_sample(x), x);
    }
}

#[test]
fn low_pass_variants_have_unity_dc_gain() {
    // 1 kHz keeps ImpInvLp2 inside its low-cutoff region, see
    // `low_pass_dc_gain_across_cutoffs`
    for algorithm in FilterAlgorithm::ALL.into_iter().filter(|a| a.is_low_pass()) {
        let mut filter = filter_for(algorithm, SR, 1000.0, DEFAULT_Q, 0.0);
        let mut last = 0.0;
        for _ in 0..(SR as usize / 2) {
            last = filter.process_sample(1.0);
        }
        assert!(
            (last - 1.0).abs() < 0.01,
            "{algorithm:?} settled at {last} for a DC input of 1.0"
        );
    }
}

#[test]
fn low_pass_dc_gain_across_cutoffs() {
    // Impulse invariance aliases the analog response, so ImpInvLp2 only holds unity DC gain
    // while the cutoff stays below roughly fs / 24. Every other low-pass is exact everywhere.
    for algorithm in FilterAlgorithm::ALL.into_iter().filter(|a| a.is_low_pass()) {
        for cutoff in [20.0, 100.0, 1000.0, 2000.0, 5000.0, 10000.0, 20000.0] {
            let filter = filter_for(algorithm, SR, cutoff, DEFAULT_Q, 0.0);
            let dc = filter.design().magnitude_at(0.0, SR);
            if algorithm != FilterAlgorithm::ImpInvLp2 {
                assert!((dc - 1.0).abs() < 1e-9, "{algorithm:?} @ {cutoff}: |H(0)| = {dc}");
            } else if cutoff <= SR / 24.0 {
                assert!((dc - 1.0).abs() < 0.01, "{algorithm:?} @ {cutoff}: |H(0)| = {dc}");
            } else {
                assert!(dc < 1.0 && dc > 0.4, "{algorithm:?} @ {cutoff}: |H(0)| = {dc}");
            }
        }
    }
}

#[test]
fn low_pass_variants_attenuate_nyquist() {
    for algorithm in FilterAlgorithm::ALL.into_iter().filter(|a| a.is_low_pass()) {
        let filter = filter_for(algorithm, SR, 1000.0, DEFAULT_Q, 0.0);
        let design = filter.design();
        let dc = design.magnitude_at(0.0, SR);
        let nyquist = design.magnitude_at(SR / 2.0, SR);
        assert!(
            nyquist < 0.1 * dc,
            "{algorithm:?}: |H(nyquist)| = {nyquist}, |H(0)| = {dc}"
        );
    }
}

#[test]
fn reset_matches_a_fresh_instance() {
    for algorithm in FilterAlgorithm::ALL {
        let mut used = filter_for(algorithm, SR, 2500.0, 1.5, 4.0);
        for n in 0..1000 {
            used.process_sample((n as f64 * 0.05).sin());
        }
        used.reset();

        let mut fresh = filter_for(algorithm, SR, 2500.0, 1.5, 4.0);
        assert_eq!(
            impulse_response(&mut used, 128),
            impulse_response(&mut fresh, 128),
            "{algorithm:?}"
        );
    }
}

#[test]
fn structures_are_numerically_equivalent() {
    let input: Vec<f64> = (0..400)
        .map(|n| (n as f64 * 0.21).sin() + 0.5 * (n as f64 * 1.7).cos())
        .collect();

    for algorithm in FilterAlgorithm::ALL {
        let coefficients = algorithm
            .design(&DesignParams {
                cutoff: 1200.0,
                q: 2.0,
                gain_db: -3.0,
                sample_rate: SR,
            })
            .coefficients;

        let outputs: Vec<Vec<f64>> = BiquadStructure::ALL
            .iter()
            .map(|&structure| {
                let mut bq = Biquad::with_structure(structure);
                bq.set_coefficients(coefficients);
                input.iter().map(|&x| bq.process_sample(x)).collect()
            })
            .collect();

        for (structure, output) in BiquadStructure::ALL.iter().zip(&outputs).skip(1) {
            for (n, (y, reference)) in output.iter().zip(&outputs[0]).enumerate() {
                assert!(
                    (y - reference).abs() < 1e-9,
                    "{algorithm:?} {structure:?} drifted at sample {n}: {y} vs {reference}"
                );
            }
        }
    }
}

#[test]
fn non_positive_q_matches_default_q() {
    for algorithm in FilterAlgorithm::ALL {
        let explicit = filter_for(algorithm, SR, 800.0, DEFAULT_Q, 2.0);
        let zero = filter_for(algorithm, SR, 800.0, 0.0, 2.0);
        let negative = filter_for(algorithm, SR, 800.0, -3.0, 2.0);
        assert_eq!(zero.design(), explicit.design(), "{algorithm:?}");
        assert_eq!(negative.design(), explicit.design(), "{algorithm:?}");
    }
}

#[test]
fn lpf2_impulse_response_is_bounded_and_decays() {
    let mut filter = filter_for(FilterAlgorithm::Lpf2, 44100.0, 1000.0, DEFAULT_Q, 0.0);
    let response = impulse_response(&mut filter, 4096);

    assert!(response.iter().all(|y| y.is_finite()));
    let energy: f64 = response.iter().map(|y| y * y).sum();
    assert!(energy.is_finite() && energy > 0.0);

    let head = response[..64].iter().fold(0.0f64, |m, y| m.max(y.abs()));
    let tail = response[4000..].iter().fold(0.0f64, |m, y| m.max(y.abs()));
    assert!(tail < head * 1e-9, "impulse response not decaying: head {head}, tail {tail}");
}

#[test]
fn low_shelf_boosts_dc_by_its_gain() {
    let mut filter = filter_for(FilterAlgorithm::LowShelf, SR, 200.0, DEFAULT_Q, 6.0);
    let mut last = 0.0;
    for _ in 0..SR as usize {
        last = filter.process_sample(1.0);
    }
    let expected = 10f64.powf(6.0 / 20.0);
    assert!((last - expected).abs() < 1e-6, "settled at {last}, expected {expected}");
}

#[test]
fn cookbook_filters_match_reference_crate() {
    let cases = [
        (FilterAlgorithm::Lpf2, Type::LowPass),
        (FilterAlgorithm::Hpf2, Type::HighPass),
    ];
    for (algorithm, kind) in cases {
        for cutoff in [100.0f64, 1000.0, 8000.0] {
            let ours = algorithm
                .design(&DesignParams {
                    cutoff,
                    q: DEFAULT_Q,
                    gain_db: 0.0,
                    sample_rate: SR,
                })
                .coefficients;
            let reference =
                RbjCoefficients::<f64>::from_params(kind, SR.hz(), cutoff.hz(), DEFAULT_Q).unwrap();

            assert!((ours.a0 - reference.b0).abs() < 1e-12, "{algorithm:?} @ {cutoff}");
            assert!((ours.a1 - reference.b1).abs() < 1e-12, "{algorithm:?} @ {cutoff}");
            assert!((ours.a2 - reference.b2).abs() < 1e-12, "{algorithm:?} @ {cutoff}");
            assert!((ours.b1 - reference.a1).abs() < 1e-12, "{algorithm:?} @ {cutoff}");
            assert!((ours.b2 - reference.a2).abs() < 1e-12, "{algorithm:?} @ {cutoff}");
        }
    }
}

#[test]
fn direct_form_matches_reference_evaluator() {
    let reference_coeffs =
        RbjCoefficients::<f64>::from_params(Type::LowPass, SR.hz(), 3000.0f64.hz(), 1.2).unwrap();
    let mut reference = DirectForm1::<f64>::new(reference_coeffs);

    let mut filter = filter_for(FilterAlgorithm::Lpf2, SR, 3000.0, 1.2, 0.0);
    for n in 0..1000 {
        let x = (n as f64 * 0.31).sin();
        let ours = filter.process_sample(x);
        let theirs = reference.run(x);
        assert!((ours - theirs).abs() < 1e-9, "sample {n}: {ours} vs {theirs}");
    }
}

#[test]
fn channels_do_not_share_state() {
    let mut left = filter_for(FilterAlgorithm::ButterLpf2, SR, 500.0, DEFAULT_Q, 0.0);
    let mut right = filter_for(FilterAlgorithm::ButterLpf2, SR, 500.0, DEFAULT_Q, 0.0);

    for _ in 0..100 {
        left.process_sample(1.0);
    }
    // right has only seen silence so far
    assert_eq!(right.process_sample(0.0), 0.0);
}

#[test]
fn parameter_sweep_stays_finite() {
    let mut filter = filter_for(FilterAlgorithm::CqParaEq, SR, 20.0, 0.1, -24.0);
    for n in 0..SR as usize {
        let t = n as f64 / SR;
        filter.set_cutoff(20.0 + 19980.0 * t);
        filter.set_q(0.1 + 17.9 * t);
        filter.set_gain_db(-24.0 + 48.0 * t);
        if n % 4800 == 0 {
            filter.set_algorithm(FilterAlgorithm::ALL[(n / 4800) % FilterAlgorithm::ALL.len()]);
        }
        let y = filter.process_sample((n as f64 * 0.07).sin());
        assert!(y.is_finite(), "non-finite output at sample {n}");
    }
}

#[test]
fn tiny_q_keeps_output_finite() {
    for algorithm in FilterAlgorithm::ALL {
        for q in [1e-6, 1e-3] {
            let mut filter = filter_for(algorithm, SR, 1000.0, q, 0.0);
            filter.set_cutoff(20000.0);
            for n in 0..2048 {
                let y = filter.process_sample((n as f64 * 0.05).sin());
                assert!(y.is_finite(), "{algorithm:?} q={q}: non-finite output at sample {n}");
            }
        }
    }
}
