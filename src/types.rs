//! Core data model: colors, configurations, guesses, outcome keys, and
//! frequency tables.
//!
//! An [`OutcomeKey`] packs one trial's ground truth and guesses into two bit
//! fields so a whole job collapses into a small [`FrequencyTable`] keyed by
//! distinct outcomes, the same shape an external execution backend reports
//! its measurement counts in.

use core::fmt;
use std::collections::HashMap;

use rand::Rng;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::MAX_PARTIES;
use crate::error::{HarnessError, Result};

/// Per-party binary attribute in the parity game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Encoded as bit 0.
    Orange,
    /// Encoded as bit 1.
    Indigo,
}

impl Color {
    /// Bit encoding of the color.
    pub fn bit(self) -> u32 {
        match self {
            Self::Orange => 0,
            Self::Indigo => 1,
        }
    }

    /// Decode a color from the low bit of `bit`.
    pub fn from_bit(bit: u32) -> Self {
        if bit & 1 == 0 {
            Self::Orange
        } else {
            Self::Indigo
        }
    }

    /// Sample a color uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_bit(u32::from(rng.gen::<bool>()))
    }

    /// Lowercase human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Indigo => "indigo",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check_parties(parties: usize) -> Result<()> {
    if parties == 0 {
        return Err(HarnessError::InvalidParameter(
            "party count must be at least 1".into(),
        ));
    }
    if parties > MAX_PARTIES {
        return Err(HarnessError::InvalidParameter(format!(
            "party count {parties} exceeds supported maximum {MAX_PARTIES}"
        )));
    }
    Ok(())
}

/// Ground-truth color assignment for one trial, one color per party.
///
/// Immutable once constructed. Generated uniformly at random per trial, or
/// supplied explicitly for worked-example walkthroughs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    colors: Vec<Color>,
}

impl Configuration {
    /// Build a configuration from explicit colors.
    pub fn from_colors(colors: Vec<Color>) -> Result<Self> {
        check_parties(colors.len())?;
        Ok(Self { colors })
    }

    /// Sample a uniformly random configuration for `parties` parties.
    pub fn random<R: Rng + ?Sized>(parties: usize, rng: &mut R) -> Result<Self> {
        check_parties(parties)?;
        let colors = (0..parties).map(|_| Color::random(rng)).collect();
        Ok(Self { colors })
    }

    /// Number of parties.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false: the one-party minimum is enforced at construction.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors, party 0 first.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The colors party `party` can see: every index strictly greater than
    /// its own.
    pub fn visible_from(&self, party: usize) -> &[Color] {
        &self.colors[(party + 1).min(self.colors.len())..]
    }

    /// Packed bit field, party `i` at bit `i`.
    pub fn bits(&self) -> u32 {
        pack_bits(&self.colors)
    }
}

/// The guesses produced by the strategy for one trial, one per party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessVector {
    guesses: Vec<Color>,
}

impl GuessVector {
    pub(crate) fn new(guesses: Vec<Color>) -> Self {
        Self { guesses }
    }

    /// Number of parties.
    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    /// Always false: produced only from valid configurations.
    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }

    /// All guesses, party 0 first.
    pub fn guesses(&self) -> &[Color] {
        &self.guesses
    }

    /// Packed bit field, party `i` at bit `i`.
    pub fn bits(&self) -> u32 {
        pack_bits(&self.guesses)
    }
}

fn pack_bits(colors: &[Color]) -> u32 {
    colors
        .iter()
        .enumerate()
        .fold(0, |acc, (i, c)| acc | (c.bit() << i))
}

fn low_mask(parties: u8) -> u32 {
    if parties as usize >= MAX_PARTIES {
        u32::MAX
    } else {
        (1u32 << parties) - 1
    }
}

/// One trial's (configuration, guesses) pair collapsed to a discrete key.
///
/// Party `i` occupies bit `i` of each field, so the rightmost bit of the
/// rendered bitstring is party 0, matching the bit ordering external
/// backends use for their counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutcomeKey {
    parties: u8,
    config: u32,
    guesses: u32,
}

impl OutcomeKey {
    /// Collapse a configuration and its guess vector into a key.
    pub fn new(config: &Configuration, guesses: &GuessVector) -> Result<Self> {
        if config.len() != guesses.len() {
            return Err(HarnessError::InvalidInput(format!(
                "configuration has {} parties but guess vector has {}",
                config.len(),
                guesses.len()
            )));
        }
        Ok(Self {
            parties: config.len() as u8,
            config: config.bits(),
            guesses: guesses.bits(),
        })
    }

    /// Build a key from raw packed bit fields, as decoded from an external
    /// backend's counts.
    pub fn from_bits(parties: usize, config: u32, guesses: u32) -> Result<Self> {
        check_parties(parties)?;
        let mask = low_mask(parties as u8);
        if config & !mask != 0 || guesses & !mask != 0 {
            return Err(HarnessError::InvalidInput(format!(
                "bit fields carry set bits above party count {parties}"
            )));
        }
        Ok(Self {
            parties: parties as u8,
            config,
            guesses,
        })
    }

    /// Number of parties encoded in the key.
    pub fn parties(&self) -> usize {
        self.parties as usize
    }

    /// Packed ground-truth bits.
    pub fn configuration_bits(&self) -> u32 {
        self.config
    }

    /// Packed guess bits.
    pub fn guess_bits(&self) -> u32 {
        self.guesses
    }

    /// Whether party `party` guessed its own color correctly.
    ///
    /// # Panics
    ///
    /// Panics if `party` is out of range.
    pub fn party_correct(&self, party: usize) -> bool {
        assert!(party < self.parties(), "party {party} out of range");
        (self.config ^ self.guesses) >> party & 1 == 0
    }

    /// Number of parties whose guess matched their own color.
    pub fn correct_count(&self) -> usize {
        let wrong = (self.config ^ self.guesses) & low_mask(self.parties);
        self.parties() - wrong.count_ones() as usize
    }
}

impl fmt::Display for OutcomeKey {
    /// Renders `guesses configuration` as fixed-width bitstrings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.parties();
        write!(
            f,
            "{:0width$b} {:0width$b}",
            self.guesses, self.config
        )
    }
}

/// Counts of observed outcome keys within a job or an aggregate.
///
/// The sum of counts in a job-level table equals the job's shot count.
/// Tables are frozen once a job completes; analyzers keep their own copies
/// and never mutate a shared instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<OutcomeKey, u64>,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `key`.
    pub fn record(&mut self, key: OutcomeKey) {
        self.record_count(key, 1);
    }

    /// Record `count` observations of `key`.
    pub fn record_count(&mut self, key: OutcomeKey, count: u64) {
        *self.counts.entry(key).or_insert(0) += count;
    }

    /// Merge another table into this one: union of keys, counts summed.
    ///
    /// Commutative and associative, so aggregate tables are independent of
    /// job completion order.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (key, count) in &other.counts {
            self.record_count(*key, *count);
        }
    }

    /// Count recorded for `key`, zero if absent.
    pub fn get(&self, key: &OutcomeKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcome keys.
    pub fn distinct_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over (key, count) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&OutcomeKey, &u64)> {
        self.counts.iter()
    }

    /// Entries sorted by key, for deterministic rendering.
    pub fn sorted_entries(&self) -> Vec<(OutcomeKey, u64)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, c)| (*k, *c)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }

    /// Party count shared by every key, if the table is non-empty and
    /// consistent.
    pub fn parties(&self) -> Option<usize> {
        let mut keys = self.counts.keys();
        let first = keys.next()?.parties();
        keys.all(|k| k.parties() == first).then_some(first)
    }

    /// Normalized distribution over "number of parties correct".
    ///
    /// Index `c` of the returned vector holds the observed probability of
    /// exactly `c` correct parties; the vector has `parties + 1` buckets.
    pub fn correct_count_distribution(&self) -> Result<Vec<f64>> {
        let parties = self.parties().ok_or_else(|| {
            HarnessError::InvalidInput(
                "cannot derive a distribution from an empty or mixed-arity table".into(),
            )
        })?;
        let total = self.total_shots();
        if total == 0 {
            return Err(HarnessError::InvalidInput(
                "frequency table counts sum to zero".into(),
            ));
        }
        let mut buckets = vec![0.0; parties + 1];
        for (key, count) in &self.counts {
            buckets[key.correct_count()] += *count as f64;
        }
        for bucket in &mut buckets {
            *bucket /= total as f64;
        }
        Ok(buckets)
    }
}

impl Serialize for FrequencyTable {
    /// Serializes as a map from rendered bitstring key to count, sorted for
    /// stable output.
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let entries = self.sorted_entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, count) in entries {
            map.serialize_entry(&key.to_string(), &count)?;
        }
        map.end()
    }
}

/// One completed job: a frozen frequency table plus its shot count and
/// position in the run. The atomic unit an analyzer ingests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    /// Zero-based job index within the run.
    pub index: usize,
    /// Number of shots the job was asked to produce.
    pub shots: u64,
    /// Outcome counts for the job.
    pub table: FrequencyTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parties: usize, config: u32, guesses: u32) -> OutcomeKey {
        OutcomeKey::from_bits(parties, config, guesses).unwrap()
    }

    #[test]
    fn key_correctness_accessors() {
        // Parties 0 and 2 correct, party 1 wrong.
        let k = key(3, 0b101, 0b111);
        assert!(k.party_correct(0));
        assert!(!k.party_correct(1));
        assert!(k.party_correct(2));
        assert_eq!(k.correct_count(), 2);
    }

    #[test]
    fn key_display_is_guesses_then_config() {
        let k = key(4, 0b0011, 0b1010);
        assert_eq!(k.to_string(), "1010 0011");
    }

    #[test]
    fn key_rejects_out_of_range_bits() {
        assert!(matches!(
            OutcomeKey::from_bits(2, 0b100, 0),
            Err(HarnessError::InvalidInput(_))
        ));
    }

    #[test]
    fn key_from_mismatched_lengths_fails() {
        let config = Configuration::from_colors(vec![Color::Orange, Color::Indigo]).unwrap();
        let guesses = GuessVector::new(vec![Color::Orange]);
        assert!(OutcomeKey::new(&config, &guesses).is_err());
    }

    #[test]
    fn configuration_visibility_excludes_self_and_behind() {
        let config = Configuration::from_colors(vec![
            Color::Orange,
            Color::Indigo,
            Color::Indigo,
            Color::Orange,
        ])
        .unwrap();
        assert_eq!(config.visible_from(0), &config.colors()[1..]);
        assert_eq!(config.visible_from(2), &[Color::Orange]);
        assert!(config.visible_from(3).is_empty());
    }

    #[test]
    fn zero_parties_rejected() {
        assert!(matches!(
            Configuration::from_colors(vec![]),
            Err(HarnessError::InvalidParameter(_))
        ));
        assert!(OutcomeKey::from_bits(0, 0, 0).is_err());
        assert!(OutcomeKey::from_bits(MAX_PARTIES + 1, 0, 0).is_err());
    }

    fn table(entries: &[(OutcomeKey, u64)]) -> FrequencyTable {
        let mut t = FrequencyTable::new();
        for (k, c) in entries {
            t.record_count(*k, *c);
        }
        t
    }

    #[test]
    fn merge_unions_keys_and_sums_counts() {
        let a = key(2, 0b00, 0b00);
        let b = key(2, 0b01, 0b01);
        let c = key(2, 0b10, 0b10);

        let mut left = table(&[(a, 3), (b, 5)]);
        let right = table(&[(a, 2), (c, 1)]);
        left.merge(&right);

        assert_eq!(left.get(&a), 5);
        assert_eq!(left.get(&b), 5);
        assert_eq!(left.get(&c), 1);
        assert_eq!(left.total_shots(), 11);
    }

    #[test]
    fn merge_is_commutative_and_associative() {
        let a = key(2, 0b00, 0b00);
        let b = key(2, 0b01, 0b01);
        let c = key(2, 0b11, 0b01);

        let x = table(&[(a, 3), (b, 5)]);
        let y = table(&[(a, 2), (c, 1)]);
        let z = table(&[(b, 7), (c, 4)]);

        let mut xy = x.clone();
        xy.merge(&y);
        let mut yx = y.clone();
        yx.merge(&x);
        assert_eq!(xy, yx);

        let mut xy_z = xy.clone();
        xy_z.merge(&z);
        let mut yz = y.clone();
        yz.merge(&z);
        let mut x_yz = x.clone();
        x_yz.merge(&yz);
        assert_eq!(xy_z, x_yz);
    }

    #[test]
    fn correct_count_distribution_normalizes() {
        // Two shots all-correct, six shots with one wrong party.
        let t = table(&[(key(3, 0b101, 0b101), 2), (key(3, 0b101, 0b100), 6)]);
        let dist = t.correct_count_distribution().unwrap();
        assert_eq!(dist.len(), 4);
        assert!((dist[3] - 0.25).abs() < 1e-12);
        assert!((dist[2] - 0.75).abs() < 1e-12);
        assert_eq!(dist[0], 0.0);
        assert_eq!(dist[1], 0.0);
    }

    #[test]
    fn distribution_of_empty_table_fails() {
        assert!(FrequencyTable::new().correct_count_distribution().is_err());
    }

    #[test]
    fn table_serializes_with_bitstring_keys() {
        let t = table(&[(key(2, 0b01, 0b01), 7)]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"01 01":7}"#);
    }
}
