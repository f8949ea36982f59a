//! Common test utilities
#![allow(dead_code)]

use shardnum::comm::{Communicator, ThreadComm};
use shardnum::dtype::{DType, Element};
use shardnum::error::Result;
use shardnum::ops::ReduceOp;
use shardnum::tensor::{Buffer, DistTensor, LocalTensor};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

/// Run `f` once per rank of a fresh `ThreadComm` group, one thread each
///
/// Results are returned in rank order.
pub fn run_spmd<T, F>(size: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(Arc<ThreadComm>) -> T + Sync,
{
    let comms = ThreadComm::group(size).unwrap();
    let f = &f;
    thread::scope(|s| {
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| s.spawn(move || f(Arc::new(comm))))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("rank panicked"))
            .collect()
    })
}

/// Like [`run_spmd`], with every rank's communicator wrapped in a [`CountingComm`]
pub fn run_spmd_counting<T, F>(size: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(Arc<CountingComm<ThreadComm>>) -> T + Sync,
{
    run_spmd(size, |comm| f(Arc::new(CountingComm::new(Arc::unwrap_or_clone(comm)))))
}

/// Communicator wrapper counting the collectives issued through it
#[derive(Debug)]
pub struct CountingComm<C> {
    inner: C,
    broadcasts: AtomicUsize,
    all_reduces: AtomicUsize,
}

impl<C: Communicator> CountingComm<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            broadcasts: AtomicUsize::new(0),
            all_reduces: AtomicUsize::new(0),
        }
    }

    pub fn broadcasts(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }

    pub fn all_reduces(&self) -> usize {
        self.all_reduces.load(Ordering::SeqCst)
    }

    /// Total number of collectives
    pub fn collectives(&self) -> usize {
        self.broadcasts() + self.all_reduces()
    }
}

impl<C: Communicator> Communicator for CountingComm<C> {
    fn rank(&self) -> usize {
        self.inner.rank()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn broadcast(&self, buffer: &mut Buffer, root: usize) -> Result<()> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        self.inner.broadcast(buffer, root)
    }

    fn all_reduce(&self, buffer: &mut Buffer, op: ReduceOp) -> Result<()> {
        self.all_reduces.fetch_add(1, Ordering::SeqCst);
        self.inner.all_reduce(buffer, op)
    }
}

/// Subscriber counting `WARN` events emitted on the current thread
pub struct WarnCounter {
    warns: Arc<AtomicUsize>,
}

impl Subscriber for WarnCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::WARN {
            self.warns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

/// Run `f` with a [`WarnCounter`] installed, returning its result and the
/// number of warnings emitted
pub fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let warns = Arc::new(AtomicUsize::new(0));
    let subscriber = WarnCounter {
        warns: Arc::clone(&warns),
    };
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, warns.load(Ordering::SeqCst))
}

/// Row-major `0..numel` in `dtype`
pub fn arange(shape: &[usize], dtype: DType) -> LocalTensor {
    let numel: usize = shape.iter().product();
    let values: Vec<f64> = (0..numel).map(|i| i as f64).collect();
    LocalTensor::from_vec(values, shape).unwrap().cast(dtype)
}

/// Distribute a global tensor given on every rank
pub fn distribute<C: Communicator>(
    global: &LocalTensor,
    split: Option<usize>,
    comm: &Arc<C>,
) -> DistTensor<C> {
    DistTensor::from_global(global.clone(), split, Arc::clone(comm)).unwrap()
}

/// Reassemble a distributed tensor and read it as `T`
pub fn gather<T: Element, C: Communicator>(t: &DistTensor<C>) -> Vec<T> {
    t.to_global().unwrap().to_vec()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
