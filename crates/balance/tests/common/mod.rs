// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use balance::{BalanceConfig, EventList, ParticleRecord};
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

pub fn shared_rng(seed: u64) -> Rc<RefCell<Xoshiro256PlusPlus>> {
    Rc::new(RefCell::new(Xoshiro256PlusPlus::seed_from_u64(seed)))
}

/// pions (211/-211) with pT in [0.2, 2], |y| < 3
pub fn pion_config(n_rap_bins: usize) -> BalanceConfig {
    BalanceConfig {
        particle_alpha: 211,
        particle_beta: -211,
        pt_min: 0.2,
        pt_max: 2.0,
        n_rap_bins,
        rap_max: 3.0,
    }
}

/// builds a particle whose non-kinematic members are unique to `tag`
pub fn particle(monval: i32, pt: f64, phi_p: f64, rap_y: f64, tag: u32) -> ParticleRecord {
    let tag = tag as f64;
    ParticleRecord {
        monval,
        pt,
        phi_p,
        rap_y,
        e: (pt * pt + 0.0195).sqrt() + tag,
        px: pt * phi_p.cos(),
        py: pt * phi_p.sin(),
        t: 5.0 + tag,
        x: 0.1 * tag,
        y: -0.1 * tag,
    }
}

/// random events holding a mix of 211, -211 and 321 particles.
pub fn random_events(seed: u64, n_events: usize, max_particles: usize) -> Vec<EventList> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let count_dist = Uniform::try_from(0..=max_particles).unwrap();
    let species_dist = Uniform::try_from(0..3_usize).unwrap();
    let pt_dist = Uniform::try_from(0.0..2.5).unwrap();
    let phi_dist = Uniform::try_from(-std::f64::consts::PI..std::f64::consts::PI).unwrap();
    let rap_dist = Uniform::try_from(-2.0..2.0).unwrap();

    let mut tag = 0;
    (0..n_events)
        .map(|_| {
            let n_particles = count_dist.sample(&mut rng);
            (0..n_particles)
                .map(|_| {
                    let monval = [211, -211, 321][species_dist.sample(&mut rng)];
                    tag += 1;
                    particle(
                        monval,
                        pt_dist.sample(&mut rng),
                        phi_dist.sample(&mut rng),
                        rap_dist.sample(&mut rng),
                        tag,
                    )
                })
                .collect()
        })
        .collect()
}

/// a fresh (empty) directory for output tables
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("balance-tests-{}-{name}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
