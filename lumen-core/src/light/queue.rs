/// A growable ring buffer used as the flood fill work queue.
///
/// Replaces recursion in the light tracer so stack depth stays bounded and
/// traversal order is deterministic. Capacity is always a power of two.
#[derive(Debug)]
pub struct LightQueue<T> {
    buf: Box<[T]>,
    head: usize,
    len: usize,
}

const INITIAL_CAPACITY: usize = 1024;

impl<T: Copy + Default> Default for LightQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> LightQueue<T> {
    /// Creates an empty queue with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![T::default(); INITIAL_CAPACITY].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// The number of queued entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the queue holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends an entry, growing the buffer when full.
    pub fn push(&mut self, value: T) {
        if self.len == self.buf.len() {
            self.grow();
        }
        let mask = self.buf.len() - 1;
        self.buf[(self.head + self.len) & mask] = value;
        self.len += 1;
    }

    /// Removes and returns the oldest entry.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.buf[self.head];
        self.head = (self.head + 1) & (self.buf.len() - 1);
        self.len -= 1;
        Some(value)
    }

    fn grow(&mut self) {
        let mut next = vec![T::default(); self.buf.len() * 2].into_boxed_slice();
        let mask = self.buf.len() - 1;
        for i in 0..self.len {
            next[i] = self.buf[(self.head + i) & mask];
        }
        self.buf = next;
        self.head = 0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut queue = LightQueue::new();
        queue.push(1u32);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut queue = LightQueue::new();
        for i in 0..(INITIAL_CAPACITY * 2 + 5) {
            queue.push(i);
        }
        for i in 0..(INITIAL_CAPACITY * 2 + 5) {
            assert_eq!(queue.pop(), Some(i));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn wraps_around() {
        let mut queue = LightQueue::new();
        for round in 0..INITIAL_CAPACITY * 3 {
            queue.push(round);
            assert_eq!(queue.pop(), Some(round));
        }
        assert_eq!(queue.len(), 0);
    }
}
