//! Thread-local scratch buffers for the contour tracer.
//!
//! Every traced cell fills two short crossing lists, and every stitched
//! chain needs a double-ended point buffer. Instead of allocating these per
//! call they are cached per thread and cleared before each use.
//!
//! A nested trace on the same thread (for example from inside an `emit`
//! callback) finds the buffer already borrowed and falls back to a fresh
//! allocation.
//!
//! ```ignore
//! use contour::scratch::with_crossing_buffers;
//!
//! let pairs = with_crossing_buffers(|forward, backward| {
//!     // fill both walks of one cell...
//!     forward.len().min(backward.len())
//! });
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::tracer::Point;

/// Initial capacity of one crossing list; covers cells crossing a few
/// dozen levels without reallocating.
const CROSSING_CAPACITY: usize = 64;

/// Initial capacity of the chain buffer.
const CHAIN_CAPACITY: usize = 1024;

/// Interpolated point where a level crosses a cell edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point,
    /// Index of the crossed level.
    pub level: usize,
}

thread_local! {
    static CROSSINGS: RefCell<(Vec<Crossing>, Vec<Crossing>)> = RefCell::new((
        Vec::with_capacity(CROSSING_CAPACITY),
        Vec::with_capacity(CROSSING_CAPACITY),
    ));
}

thread_local! {
    static CHAIN: RefCell<VecDeque<Point>> = RefCell::new(VecDeque::with_capacity(CHAIN_CAPACITY));
}

/// Run `f` with the forward and backward crossing lists, both empty.
#[inline]
pub fn with_crossing_buffers<F, R>(f: F) -> R
where
    F: FnOnce(&mut Vec<Crossing>, &mut Vec<Crossing>) -> R,
{
    CROSSINGS.with(|cell| match cell.try_borrow_mut() {
        Ok(mut buffers) => {
            let (forward, backward) = &mut *buffers;
            forward.clear();
            backward.clear();
            f(forward, backward)
        }
        Err(_) => f(
            &mut Vec::with_capacity(CROSSING_CAPACITY),
            &mut Vec::with_capacity(CROSSING_CAPACITY),
        ),
    })
}

/// Run `f` with an empty chain buffer.
#[inline]
pub fn with_chain_buffer<F, R>(f: F) -> R
where
    F: FnOnce(&mut VecDeque<Point>) -> R,
{
    CHAIN.with(|cell| match cell.try_borrow_mut() {
        Ok(mut chain) => {
            chain.clear();
            f(&mut chain)
        }
        Err(_) => f(&mut VecDeque::with_capacity(CHAIN_CAPACITY)),
    })
}

/// Capacities of this thread's scratch buffers (for debugging/monitoring).
#[derive(Debug, Default, Clone)]
pub struct ScratchStats {
    pub forward_capacity: usize,
    pub backward_capacity: usize,
    pub chain_capacity: usize,
}

/// Get current scratch buffer statistics for this thread.
pub fn scratch_stats() -> ScratchStats {
    let (forward_capacity, backward_capacity) = CROSSINGS.with(|cell| {
        cell.try_borrow()
            .map(|b| (b.0.capacity(), b.1.capacity()))
            .unwrap_or_default()
    });
    ScratchStats {
        forward_capacity,
        backward_capacity,
        chain_capacity: CHAIN.with(|cell| cell.try_borrow().map(|c| c.capacity()).unwrap_or(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossing(level: usize) -> Crossing {
        Crossing {
            point: Point::new(level as f64, 0.0),
            level,
        }
    }

    #[test]
    fn test_crossing_buffers_cleared() {
        let filled = with_crossing_buffers(|forward, backward| {
            forward.push(crossing(1));
            backward.push(crossing(2));
            backward.push(crossing(3));
            forward.len() + backward.len()
        });
        assert_eq!(filled, 3);

        with_crossing_buffers(|forward, backward| {
            assert!(forward.is_empty());
            assert!(backward.is_empty());
        });
    }

    #[test]
    fn test_nested_use_allocates() {
        with_crossing_buffers(|outer, _| {
            outer.push(crossing(7));
            with_crossing_buffers(|inner, _| {
                assert!(inner.is_empty());
                inner.push(crossing(8));
            });
            assert_eq!(outer.len(), 1);
        });
    }

    #[test]
    fn test_chain_buffer() {
        with_chain_buffer(|chain| {
            chain.push_back(Point::new(1.0, 1.0));
            chain.push_front(Point::new(0.0, 0.0));
        });
        with_chain_buffer(|chain| assert!(chain.is_empty()));
    }

    #[test]
    fn test_scratch_stats() {
        with_crossing_buffers(|forward, _| forward.extend((0..200).map(crossing)));
        let stats = scratch_stats();
        assert!(stats.forward_capacity >= 200);
        assert!(stats.chain_capacity >= CHAIN_CAPACITY);
    }
}
