mod common;

use std::f64::consts::PI;

use balance::{
    BalanceAnalysis, BalanceConfig, Channel, EventList, InMemorySamples, NORM_EPSILON,
    ParticleCounts, RandomHandle,
};
use common::{isclose, particle, pion_config, random_events, shared_rng};
use ndarray::Zip;

const SAME_EVENT: [Channel; 4] = [
    Channel::Ab,
    Channel::AbarBbar,
    Channel::AbBar,
    Channel::AbarB,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_accumulate() {
        let events = random_events(31415, 11, 12);
        let owner = shared_rng(1);

        // process 3 events at a time
        let mut chunked = BalanceAnalysis::new(pion_config(8), RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(events.clone(), 3, 211, -211).unwrap();
        chunked.run(&mut source).unwrap();

        // process everything at once
        let mut single = BalanceAnalysis::new(pion_config(8), RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(events.clone(), events.len(), 211, -211).unwrap();
        single.run(&mut source).unwrap();

        assert_eq!(chunked.counts(), single.counts());
        assert!(chunked.counts().total() > 0);
        for channel in SAME_EVENT {
            assert_eq!(
                chunked.histograms().view(channel),
                single.histograms().view(channel),
                "the {channel} histograms differ"
            );
        }
        assert!(single.histograms().total(Channel::Ab) > 0.0);
    }

    #[test]
    fn counts_only_include_qualifying_particles() {
        let events: Vec<EventList> = vec![
            vec![
                particle(-211, 0.1, 0.0, 0.0, 0),
                particle(-211, 0.2, 0.0, 0.0, 1),
                particle(211, 2.0, 0.0, 0.0, 2),
                particle(211, 2.1, 0.0, 0.0, 3),
            ],
            vec![particle(-211, 1.0, 0.0, 0.0, 4), particle(321, 1.0, 0.0, 0.0, 5)],
        ];
        let owner = shared_rng(2);
        let mut analysis = BalanceAnalysis::new(pion_config(3), RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(events, 1, 211, -211).unwrap();
        analysis.run(&mut source).unwrap();

        // with beta = -211, the b role holds the π⁻ and b̄ holds the π⁺
        assert_eq!(analysis.counts(), ParticleCounts { n_b: 2, n_bbar: 1 });
    }

    #[test]
    fn conjugate_species_exclude_self_pairs() {
        let events = vec![vec![
            particle(211, 1.0, 0.2, 0.3, 0),
            particle(-211, 1.0, 0.1, 0.0, 1),
        ]];
        let owner = shared_rng(3);
        let mut analysis = BalanceAnalysis::new(pion_config(3), RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(events, 1, 211, -211).unwrap();
        analysis.run(&mut source).unwrap();

        let hists = analysis.histograms();
        assert_eq!(hists.total(Channel::Ab), 1.0);
        assert_eq!(hists.total(Channel::AbarBbar), 1.0);
        // each of these would only hold a particle paired with itself
        assert_eq!(hists.total(Channel::AbBar), 0.0);
        assert_eq!(hists.total(Channel::AbarB), 0.0);
        assert_eq!(analysis.counts(), ParticleCounts { n_b: 1, n_bbar: 1 });
    }

    #[test]
    fn unrelated_species_keep_identical_pairs() {
        // a = π⁺, b = π⁺: the ab channel pairs every π⁺ with itself too
        let events = vec![vec![particle(211, 1.0, 0.2, 0.3, 0)]];
        let config = BalanceConfig {
            particle_beta: 211,
            ..pion_config(3)
        };
        let owner = shared_rng(4);
        let mut analysis = BalanceAnalysis::new(config, RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(events, 1, 211, 211).unwrap();
        analysis.run(&mut source).unwrap();
        assert_eq!(analysis.histograms().total(Channel::Ab), 1.0);
    }

    #[test]
    fn single_cell_normalization() {
        // every pair has Δy = -2 and Δφ = -π/2 + 0.1, which is bin (0, 0)
        let config = BalanceConfig {
            particle_beta: 321,
            ..pion_config(3)
        };
        let mut event = Vec::new();
        let mut tag = 0;
        let mut push = |monval: i32, phi: f64, rap: f64, n: usize| {
            for _ in 0..n {
                tag += 1;
                event.push(particle(monval, 1.0, phi, rap, tag));
            }
        };
        push(211, 0.0, 0.0, 2);
        push(-211, 0.0, 0.0, 1);
        push(321, PI / 2.0 - 0.1, 2.0, 3);
        push(-321, PI / 2.0 - 0.1, 2.0, 1);

        let owner = shared_rng(5);
        let mut analysis = BalanceAnalysis::new(config, RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(vec![event], 1, 211, 321).unwrap();
        analysis.run(&mut source).unwrap();
        assert_eq!(analysis.counts(), ParticleCounts { n_b: 3, n_bbar: 1 });

        let obs = analysis.observables();
        let norm = 4.0 + NORM_EPSILON;
        // OS: 2*3 (ab) + 1*1 (āb̄), SS: 2*1 (ab̄) + 1*3 (āb)
        assert_eq!(obs.os_2d[[0, 0]], 7.0 / norm);
        assert_eq!(obs.os_2d.sum(), 7.0 / norm);
        assert_eq!(obs.ss_2d[[0, 0]], 5.0 / norm);
        assert_eq!(obs.ss_2d.sum(), 5.0 / norm);
        assert_eq!(obs.b_delta_y[0], 2.0 / norm);
        assert_eq!(obs.b_delta_phi[0], 0.5);
    }

    #[test]
    fn correlation_rescaling_is_self_consistent() {
        let events = random_events(2718, 20, 10);
        let owner = shared_rng(6);
        let mut analysis = BalanceAnalysis::new(pion_config(6), RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(events, 4, 211, -211).unwrap();
        analysis.run(&mut source).unwrap();

        let hists = analysis.histograms();
        let os = &hists.view(Channel::Ab) + &hists.view(Channel::AbarBbar);
        let mixed_os = &hists.view(Channel::MixedAb) + &hists.view(Channel::MixedAbarBbar);
        let n_os = os.sum();
        let n_mixed_os = mixed_os.sum();
        assert!(n_os > 0.0 && n_mixed_os > 0.0);

        let mut direct = 0.0;
        Zip::from(&os)
            .and(&mixed_os)
            .for_each(|&s, &m| direct += s / (m + NORM_EPSILON));

        let obs = analysis.observables();
        let undone = obs.os_correlation.sum() * n_os / n_mixed_os;
        assert!(isclose(undone, direct, 1e-12, 0.0), "{undone} vs {direct}");
    }

    #[test]
    fn mixed_same_sign_channels_alias() {
        let events = random_events(99, 10, 10);
        let owner = shared_rng(7);
        let mut analysis = BalanceAnalysis::new(pion_config(6), RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(events, 5, 211, -211).unwrap();
        analysis.run(&mut source).unwrap();

        let hists = analysis.histograms();
        assert!(hists.total(Channel::MixedAb) > 0.0);
        assert!(hists.total(Channel::MixedAbBar) > 0.0);
        assert_eq!(hists.total(Channel::MixedAbarB), 0.0);
    }

    #[test]
    fn mixing_is_reproducible() {
        let events = random_events(5, 9, 8);
        let run = |seed| {
            let owner = shared_rng(seed);
            let mut analysis =
                BalanceAnalysis::new(pion_config(6), RandomHandle::new(&owner)).unwrap();
            let mut source = InMemorySamples::new(events.clone(), 3, 211, -211).unwrap();
            analysis.run(&mut source).unwrap();
            analysis.histograms().view(Channel::MixedAb).to_owned()
        };
        assert_eq!(run(17), run(17));
    }

    #[test]
    fn dropped_generator_is_fatal() {
        let events = random_events(8, 4, 6);
        let owner = shared_rng(8);
        let mut analysis = BalanceAnalysis::new(pion_config(6), RandomHandle::new(&owner)).unwrap();
        drop(owner);

        let mut source = InMemorySamples::new(events, 2, 211, -211).unwrap();
        let err = analysis.run(&mut source).unwrap_err();
        assert!(err.to_string().contains("random number generator"));
    }

    #[test]
    fn empty_source() {
        let owner = shared_rng(9);
        let mut analysis = BalanceAnalysis::new(pion_config(6), RandomHandle::new(&owner)).unwrap();
        let mut source = InMemorySamples::new(Vec::new(), 2, 211, -211).unwrap();
        analysis.run(&mut source).unwrap();
        assert_eq!(analysis.counts().total(), 0);
        for channel in Channel::ALL {
            assert_eq!(analysis.histograms().total(channel), 0.0);
        }
    }

    #[test]
    fn invalid_config() {
        let owner = shared_rng(10);
        let config = BalanceConfig {
            rap_max: -1.0,
            ..pion_config(6)
        };
        assert!(BalanceAnalysis::new(config, RandomHandle::new(&owner)).is_err());
    }
}
