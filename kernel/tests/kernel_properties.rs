//! Property tests for the hash kernels and the evaluator.

use bucket_hash::{evaluate, BucketHasher, HashKernel, Key};
use proptest::prelude::*;

fn any_kernel() -> impl Strategy<Value = HashKernel> {
    prop::sample::select(HashKernel::ALL.to_vec())
}

proptest! {
    #[test]
    fn hash_is_deterministic(kernel in any_kernel(), key in 0u32..65536) {
        prop_assert_eq!(kernel.hash(key), kernel.hash(key));
    }

    #[test]
    fn bucket_is_in_range(kernel in any_kernel(), key in any::<u32>(), n in 1u32..10_000) {
        let b = kernel.bucket(key, n).unwrap();
        prop_assert!(b < n);
        prop_assert_eq!(b, kernel.hash(key) % n);
    }

    #[test]
    fn zero_buckets_always_rejected(kernel in any_kernel(), key in any::<u32>()) {
        let err = kernel.bucket(key, 0).unwrap_err();
        prop_assert!(err.is_invalid_argument());
    }

    #[test]
    fn single_bucket_collapses(kernel in any_kernel(), key in any::<u32>()) {
        prop_assert_eq!(kernel.bucket(key, 1).unwrap(), 0);
    }

    #[test]
    fn byte_split_truncates_high_bits(x in 0u32..65536) {
        let kernel = HashKernel::FnvByteSplit;
        prop_assert_eq!(kernel.hash(65536 + x), kernel.hash(x));
    }

    #[test]
    fn histogram_conserves_keys(
        kernel in any_kernel(),
        keys in prop::collection::vec(0u32..65536, 0..500),
        n in prop::option::of(1u32..300),
    ) {
        let eval = evaluate(&kernel, keys.iter().copied(), n).unwrap();
        prop_assert_eq!(eval.total_keys(), keys.len());

        let mut seen: Vec<Key> = eval.histogram.values().flatten().copied().collect();
        let mut expected = keys.clone();
        seen.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);

        if let Some(n) = n {
            prop_assert!(eval.histogram.keys().all(|&b| b < n));
            prop_assert!(eval.result.occupied <= n);
        }
        prop_assert!(eval.result.spread as usize <= keys.len());
    }
}

#[test]
fn conformance_vectors() {
    let d = HashKernel::MultiplicativeFold;
    assert_eq!(d.hash(0), 0);
    assert_eq!(d.hash(1), 39210);
    assert_eq!(d.bucket(1, 256).unwrap(), 42);
    assert_eq!(d.default_bucket(1), 42);
    assert_eq!(d.hash(255), 32946);
    assert_eq!(d.hash(65535), 65492);

    let a = HashKernel::FnvByteSplit;
    assert_eq!(a.hash(256), 2583270605);
    assert_eq!(a.hash(4660), 2657085826);
    assert_eq!(a.hash(65535), 2997642750);

    let b = HashKernel::FnvWhole;
    assert_eq!(b.hash(256), 3012741068);
    assert_eq!(b.hash(4660), 939466640);
    assert_eq!(b.hash(65535), 4280275457);

    assert_eq!(HashKernel::Multiplicative.hash(4660), 3522737244);
}

#[test]
fn empty_evaluation_is_trivial() {
    for kernel in HashKernel::ALL {
        let eval = evaluate(&kernel, Vec::<Key>::new(), Some(1)).unwrap();
        assert!(eval.histogram.is_empty());
        assert_eq!(eval.result.spread, 0);
        assert_eq!(eval.result.occupied, 0);
    }
}
