use rustc_hash::FxHashMap;

/// Running statistic for one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stat {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl Stat {
    fn new(value: f64) -> Self {
        Self { min: value, max: value, sum: value, count: 1 }
    }

    /// Strict comparisons, so between `0.0` and `-0.0` the first seen is kept.
    #[inline]
    fn add(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.sum += value;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Per-station statistics keyed by the raw name bytes.
///
/// Lookups borrow the name from the caller's buffer; an owned key is only
/// allocated the first time a station is seen. `names` keeps every station in
/// first-seen order and is what output sorting walks.
#[derive(Debug, Default)]
pub struct AggregationTable {
    stats: FxHashMap<Box<[u8]>, Stat>,
    names: Vec<Box<[u8]>>,
    records: u64,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stats: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            names: Vec::with_capacity(capacity),
            records: 0,
        }
    }

    /// Folds one record into the table.
    #[inline]
    pub fn update(&mut self, name: &[u8], value: f64) {
        self.records += 1;
        if let Some(stat) = self.stats.get_mut(name) {
            stat.add(value);
        } else {
            let owned: Box<[u8]> = name.into();
            self.names.push(owned.clone());
            self.stats.insert(owned, Stat::new(value));
        }
    }

    pub fn get(&self, name: &[u8]) -> Option<&Stat> {
        self.stats.get(name)
    }

    /// Number of distinct stations.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Station names in first-seen order.
    pub fn names(&self) -> &[Box<[u8]>] {
        &self.names
    }

    /// Total records folded in so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Stations with their stats, ascending by raw bytes.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&[u8], &Stat)> + '_ {
        let mut order: Vec<&[u8]> = self.names.iter().map(|n| &n[..]).collect();
        order.sort_unstable();
        order.into_iter().filter_map(move |name| self.stats.get(name).map(|s| (name, s)))
    }
}
