//! Free-list object pool
//!
//! Coins, enemies and particles are spawned and retired many times per
//! second. Retired objects park here and are handed back out before anything
//! new is constructed.

/// LIFO free list of constructed-but-unused objects
#[derive(Debug, Clone)]
pub struct Pool<T> {
    free: Vec<T>,
    make: fn() -> T,
    /// Objects built by this pool so far (pre-warm included)
    constructed: usize,
}

impl<T> Pool<T> {
    /// Empty pool that builds new objects with `make` on a miss
    pub fn new(make: fn() -> T) -> Self {
        Self {
            free: Vec::new(),
            make,
            constructed: 0,
        }
    }

    /// Pool pre-filled with `count` objects
    pub fn with_prewarm(make: fn() -> T, count: usize) -> Self {
        let mut pool = Self::new(make);
        pool.free.reserve(count);
        for _ in 0..count {
            pool.free.push(make());
        }
        pool.constructed = count;
        pool
    }

    /// Take the most recently released object, or build a new one
    pub fn acquire(&mut self) -> T {
        match self.free.pop() {
            Some(item) => item,
            None => {
                self.constructed += 1;
                (self.make)()
            }
        }
    }

    /// Park an object for reuse.
    ///
    /// The pool takes ownership, so an object cannot sit here and in an
    /// active list at the same time.
    pub fn release(&mut self, item: T) {
        self.free.push(item);
    }

    /// Number of parked objects
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Total objects this pool has ever constructed
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    /// Parked objects, most recently released last
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.free.iter()
    }
}
