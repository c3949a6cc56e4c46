//! End-to-end tests across the forward, inverse and pool types.

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tdp::{Tdp, TdpInverse, TdpMultPool};

// WARNING: tiny keys, chosen for test speed only.
const MESSAGE_SIZE: usize = 64;

const TEST_COUNT: usize = 3;
const POOL_COUNT: u8 = 20;
const INV_MULT_COUNT: usize = 200;

#[test]
fn correctness() {
    let mut rng = ChaCha8Rng::from_seed([101; 32]);

    for _ in 0..TEST_COUNT {
        let inverse = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();

        let pk = inverse.public_key_pem().unwrap();
        let tdp = Tdp::from_public_key_pem(&pk, MESSAGE_SIZE).unwrap();

        let sample = tdp.sample(&mut rng).unwrap();
        let enc = tdp.eval(&sample).unwrap();
        let dec = inverse.invert(&enc).unwrap();

        assert_eq!(sample, dec);
    }
}

#[test]
fn inversions_and_evaluations_cancel() {
    let mut rng = ChaCha8Rng::from_seed([102; 32]);

    for i in 0..TEST_COUNT {
        let inverse = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();

        let pk = inverse.public_key_pem().unwrap();
        let tdp = Tdp::from_public_key_pem(&pk, MESSAGE_SIZE).unwrap();

        let sample = inverse.sample(&mut rng).unwrap();

        let mut v = sample.clone();
        for _ in 0..i {
            v = inverse.invert(&v).unwrap();
        }
        for _ in 0..i {
            v = tdp.eval(&v).unwrap();
        }

        assert_eq!(sample, v);
    }
}

#[test]
fn pool_evaluation_matches_iterated_evaluation() {
    let mut rng = ChaCha8Rng::from_seed([103; 32]);
    let inverse = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();

    let pk = inverse.public_key_pem().unwrap();
    let pool = TdpMultPool::from_public_key_pem(&pk, MESSAGE_SIZE, POOL_COUNT).unwrap();

    assert_eq!(pool.maximum_order(), POOL_COUNT);
    assert_eq!(pool.pool_size(), POOL_COUNT);

    let sample = pool.sample(&mut rng).unwrap();
    let mut iterated = sample.clone();
    for order in 1..=pool.maximum_order() {
        iterated = inverse.eval(&iterated).unwrap();
        assert_eq!(pool.eval(&sample, order).unwrap(), iterated);
    }
}

#[test]
fn repeated_inversion_matches_iterated_inversion() {
    let mut rng = ChaCha8Rng::from_seed([104; 32]);
    let inverse = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();

    let sample = inverse.sample(&mut rng).unwrap();
    let goal = inverse.invert_mult(&sample, INV_MULT_COUNT).unwrap();

    let mut v = sample;
    for _ in 0..INV_MULT_COUNT {
        v = inverse.invert(&v).unwrap();
    }

    assert_eq!(goal, v);
}

// Generate a key pair, hand the exported public key to a pool and a plain
// forward instance, advance a sample five rounds through the pool, and undo
// all five rounds with one private operation.
#[test]
fn public_pool_advance_and_private_rewind() {
    let mut rng = ChaCha8Rng::from_seed([105; 32]);
    let inverse = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();

    let pk = inverse.public_key_pem().unwrap();
    let tdp = Tdp::from_public_key_pem(&pk, MESSAGE_SIZE).unwrap();
    let pool = TdpMultPool::from_public_key_pem(&pk, MESSAGE_SIZE, 20).unwrap();

    let m = pool.sample(&mut rng).unwrap();

    let advanced = pool.eval(&m, 5).unwrap();
    let mut iterated = m.clone();
    for _ in 0..5 {
        iterated = tdp.eval(&iterated).unwrap();
    }
    assert_eq!(advanced, iterated);

    assert_eq!(inverse.invert_mult(&advanced, 5).unwrap(), m);
}

#[test]
fn independent_copies_share_the_key() {
    let mut rng = ChaCha8Rng::from_seed([106; 32]);
    let inverse = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();
    let copy = inverse.clone();

    let m = inverse.sample(&mut rng).unwrap();
    let c = inverse.eval(&m).unwrap();
    drop(inverse);

    assert_eq!(copy.invert(&c).unwrap(), m);
}

#[test]
fn private_key_round_trips_through_der() {
    let mut rng = ChaCha8Rng::from_seed([107; 32]);
    let inverse = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();

    let der = inverse.private_key_der().unwrap();
    let imported = TdpInverse::from_private_key_der(&der, MESSAGE_SIZE).unwrap();
    assert_eq!(*imported.private_key_der().unwrap(), *der);

    let m = inverse.sample(&mut rng).unwrap();
    let c = inverse.eval(&m).unwrap();
    assert_eq!(imported.invert(&c).unwrap(), m);
}
