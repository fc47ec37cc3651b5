/// A fixed-size ringbuffer
///
/// Grows until it reaches `capacity`, after which every push overwrites the oldest element.
#[derive(Debug, Default, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    ix: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be positive");
        Self {
            buffer: Vec::<T>::with_capacity(capacity),
            ix: 0,
            capacity,
        }
    }

    /// Returns the buffer length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Insert an element into the buffer, overwriting the oldest element, and return the write
    /// index
    pub fn push(&mut self, item: T) -> usize {
        let ix = self.ix;
        if ix >= self.len() {
            self.buffer.push(item);
        } else {
            self.buffer[ix] = item;
        }
        self.ix = (ix + 1) % self.capacity;
        ix
    }

    /// Iterate from the oldest to the newest element
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let split = if self.len() < self.capacity { 0 } else { self.ix };
        self.buffer[split..].iter().chain(&self.buffer[..split])
    }

    /// Get a slice view of the internal buffer, in storage order
    pub fn view(&self) -> &[T] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ringbuffer_functional() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.len(), 0, "initialized empty");
        assert!(buf.is_empty());

        for i in 0..4 {
            buf.push(i * 2);
        }

        assert_eq!(buf.len(), 4, "length correct");
        assert_eq!(buf.view(), [0, 2, 4, 6], "contents correct");

        buf.push(1);
        let ix = buf.push(3);
        assert_eq!(ix, 1, "write index is correct");
        assert_eq!(buf.len(), 4, "length unchanged");
        assert_eq!(buf.view(), [1, 3, 4, 6], "contents overwritten correctly");
        assert_eq!(
            buf.iter().copied().collect::<Vec<_>>(),
            [4, 6, 1, 3],
            "iterates oldest first"
        );
    }

    #[test]
    fn iter_before_wrapping() {
        let mut buf = RingBuffer::new(3);
        buf.push('a');
        buf.push('b');
        assert_eq!(buf.iter().collect::<String>(), "ab");
    }
}
