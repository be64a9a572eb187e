//! Simulated tag table.
//!
//! The `TagTable` manages:
//! - Boolean tags with value, quality and timestamp
//! - Linked reactions (a tag edge triggers a delayed change of another tag)
//! - Fault injection (unreachable tags, refused writes)
//! - An ordered journal of every write attempt

use absorber_common::endpoint::{EndpointSample, EndpointTarget, Quality};
use absorber_common::transport::TransportError;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, trace};

use super::config::{LinkedTagConfig, SimulationConfig};

/// One write attempt as seen by the simulated PLC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Written tag.
    pub target: EndpointTarget,
    /// Written value.
    pub value: bool,
    /// Whether the write was committed.
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy)]
struct SimTag {
    value: bool,
    quality: Quality,
    timestamp: SystemTime,
    reachable: bool,
    refuse_writes: bool,
}

impl SimTag {
    fn new(value: bool, quality: Quality) -> Self {
        Self {
            value,
            quality,
            timestamp: SystemTime::now(),
            reachable: true,
            refuse_writes: false,
        }
    }

    fn set(&mut self, value: bool) {
        self.value = value;
        self.timestamp = SystemTime::now();
    }
}

/// Tag change queued by a linked reaction.
#[derive(Debug, Clone)]
struct PendingChange {
    trigger_time: Instant,
    target: EndpointTarget,
    new_state: bool,
}

/// In-memory PLC tag table.
pub struct TagTable {
    tags: HashMap<EndpointTarget, SimTag>,
    links: Vec<LinkedTagConfig>,
    pending_changes: VecDeque<PendingChange>,
    journal: Vec<WriteRecord>,
    auto_create: bool,
}

impl TagTable {
    /// Build the table from the driver configuration.
    pub fn new(config: &SimulationConfig) -> Self {
        let tags: HashMap<EndpointTarget, SimTag> = config
            .tags
            .iter()
            .map(|t| (t.target.clone(), SimTag::new(t.init, t.quality)))
            .collect();

        debug!(
            "TagTable initialized: {} tags, {} linked reactions",
            tags.len(),
            config.links.len()
        );

        Self {
            tags,
            links: config.links.clone(),
            pending_changes: VecDeque::new(),
            journal: Vec::new(),
            auto_create: config.auto_create,
        }
    }

    /// Read one tag, applying due reactions first.
    pub fn read(
        &mut self,
        target: &EndpointTarget,
        now: Instant,
    ) -> Result<EndpointSample, TransportError> {
        self.process_pending_changes(now);
        let tag = self.reachable_tag(target)?;
        let sample = EndpointSample::new(tag.value, tag.timestamp, tag.quality);
        trace!("read {} = {} ({})", target, sample.value, sample.quality);
        Ok(sample)
    }

    /// Write one tag. Every attempt is journaled, committed or not.
    pub fn write(
        &mut self,
        target: &EndpointTarget,
        value: bool,
        now: Instant,
    ) -> Result<(), TransportError> {
        self.process_pending_changes(now);
        let result = self.commit_write(target, value);
        self.journal.push(WriteRecord {
            target: target.clone(),
            value,
            accepted: result.is_ok(),
        });
        let changed = result?;
        trace!("write {} = {}", target, value);
        if changed {
            self.handle_edge(target, value, now);
            self.process_pending_changes(now);
        }
        Ok(())
    }

    /// Returns whether the value changed.
    fn commit_write(&mut self, target: &EndpointTarget, value: bool) -> Result<bool, TransportError> {
        let tag = self.reachable_tag(target)?;
        if tag.refuse_writes {
            return Err(TransportError::Refused(format!("{target} refuses writes")));
        }
        let changed = tag.value != value;
        tag.set(value);
        tag.quality = Quality::Good;
        Ok(changed)
    }

    fn reachable_tag(&mut self, target: &EndpointTarget) -> Result<&mut SimTag, TransportError> {
        if self.auto_create && !self.tags.contains_key(target) {
            debug!("Auto-creating tag {}", target);
            self.tags
                .insert(target.clone(), SimTag::new(false, Quality::Good));
        }
        match self.tags.get_mut(target) {
            Some(tag) if tag.reachable => Ok(tag),
            Some(_) => Err(TransportError::Unreachable(format!("{target} is offline"))),
            None => Err(TransportError::Unreachable(format!("{target} is not a known tag"))),
        }
    }

    /// Queue linked reactions for an edge of `source`.
    fn handle_edge(&mut self, source: &EndpointTarget, new_state: bool, now: Instant) {
        for link in self
            .links
            .iter()
            .filter(|l| &l.source == source && l.value == new_state)
        {
            trace!(
                "{} -> {} queued {} = {} in {}ms",
                source, new_state, link.target, link.set, link.delay_ms
            );
            self.pending_changes.push_back(PendingChange {
                trigger_time: now + Duration::from_millis(link.delay_ms),
                target: link.target.clone(),
                new_state: link.set,
            });
        }
    }

    /// Apply pending changes whose time has arrived.
    fn process_pending_changes(&mut self, now: Instant) {
        let (due, waiting): (VecDeque<_>, VecDeque<_>) = self
            .pending_changes
            .drain(..)
            .partition(|change| change.trigger_time <= now);
        self.pending_changes = waiting;

        for change in due {
            if let Some(tag) = self.tags.get_mut(&change.target) {
                let old = tag.value;
                tag.set(change.new_state);
                if old != change.new_state {
                    debug!("{} changed: {} -> {}", change.target, old, change.new_state);
                }
            }
        }
    }

    /// Force a tag value, bypassing refusal and reachability.
    pub fn set_value(&mut self, target: &EndpointTarget, value: bool) {
        self.tags
            .entry(target.clone())
            .or_insert_with(|| SimTag::new(value, Quality::Good))
            .set(value);
    }

    /// Take a tag offline or bring it back.
    pub fn set_reachable(&mut self, target: &EndpointTarget, reachable: bool) {
        if let Some(tag) = self.tags.get_mut(target) {
            tag.reachable = reachable;
        }
    }

    /// Make a tag refuse (or accept again) every write.
    pub fn set_refuse_writes(&mut self, target: &EndpointTarget, refuse: bool) {
        if let Some(tag) = self.tags.get_mut(target) {
            tag.refuse_writes = refuse;
        }
    }

    /// Change the quality reported for a tag. Counts as a fresh sample.
    pub fn set_quality(&mut self, target: &EndpointTarget, quality: Quality) {
        if let Some(tag) = self.tags.get_mut(target) {
            tag.quality = quality;
            tag.timestamp = SystemTime::now();
        }
    }

    /// Current value, ignoring reachability.
    pub fn peek(&self, target: &EndpointTarget) -> Option<bool> {
        self.tags.get(target).map(|t| t.value)
    }

    /// Write attempts in order.
    pub fn journal(&self) -> &[WriteRecord] {
        &self.journal
    }

    /// Forget all journaled writes.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Number of reactions not applied yet.
    pub fn pending_count(&self) -> usize {
        self.pending_changes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> EndpointTarget {
        s.parse().unwrap()
    }

    fn table() -> TagTable {
        let config = SimulationConfig::default()
            .with_tag(&t("plc/Insert"), false)
            .with_tag(&t("plc/Inserted"), false)
            .with_link(&t("plc/Insert"), true, &t("plc/Inserted"), true);
        TagTable::new(&config)
    }

    #[test]
    fn read_initial_value() {
        let mut table = table();
        let sample = table.read(&t("plc/Insert"), Instant::now()).unwrap();
        assert!(!sample.value);
        assert_eq!(sample.quality, Quality::Good);
    }

    #[test]
    fn unknown_tag_unreachable() {
        let mut table = table();
        let result = table.read(&t("plc/Nope"), Instant::now());
        assert!(matches!(result, Err(TransportError::Unreachable(_))));
    }

    #[test]
    fn auto_create_makes_unknown_tags() {
        let config = SimulationConfig {
            auto_create: true,
            ..SimulationConfig::default()
        };
        let mut table = TagTable::new(&config);
        table.write(&t("plc/New"), true, Instant::now()).unwrap();
        assert_eq!(table.peek(&t("plc/New")), Some(true));
    }

    #[test]
    fn zero_delay_link_applies_with_write() {
        let mut table = table();
        table.write(&t("plc/Insert"), true, Instant::now()).unwrap();
        assert_eq!(table.peek(&t("plc/Inserted")), Some(true));
        assert_eq!(table.pending_count(), 0);
    }

    #[test]
    fn delayed_link_applies_on_later_access() {
        let mut config = SimulationConfig::default()
            .with_tag(&t("plc/Insert"), false)
            .with_tag(&t("plc/Inserted"), false)
            .with_link(&t("plc/Insert"), true, &t("plc/Inserted"), true);
        config.links[0].delay_ms = 500;
        let mut table = TagTable::new(&config);

        let start = Instant::now();
        table.write(&t("plc/Insert"), true, start).unwrap();
        assert_eq!(table.pending_count(), 1);
        assert!(!table.read(&t("plc/Inserted"), start).unwrap().value);

        let later = start + Duration::from_millis(600);
        assert!(table.read(&t("plc/Inserted"), later).unwrap().value);
        assert_eq!(table.pending_count(), 0);
    }

    #[test]
    fn rewrite_same_value_does_not_retrigger() {
        let mut table = table();
        let now = Instant::now();
        table.write(&t("plc/Insert"), true, now).unwrap();
        table.set_value(&t("plc/Inserted"), false);
        table.write(&t("plc/Insert"), true, now).unwrap();
        assert_eq!(table.peek(&t("plc/Inserted")), Some(false));
    }

    #[test]
    fn offline_tag_rejects_and_journals() {
        let mut table = table();
        table.set_reachable(&t("plc/Insert"), false);
        let result = table.write(&t("plc/Insert"), true, Instant::now());
        assert!(matches!(result, Err(TransportError::Unreachable(_))));
        assert_eq!(
            table.journal(),
            &[WriteRecord {
                target: t("plc/Insert"),
                value: true,
                accepted: false,
            }]
        );
        assert_eq!(table.peek(&t("plc/Insert")), Some(false));
    }

    #[test]
    fn refused_write_keeps_value() {
        let mut table = table();
        table.set_refuse_writes(&t("plc/Insert"), true);
        let result = table.write(&t("plc/Insert"), true, Instant::now());
        assert!(matches!(result, Err(TransportError::Refused(_))));
        assert_eq!(table.peek(&t("plc/Insert")), Some(false));
    }

    #[test]
    fn successful_write_restores_good_quality() {
        let mut table = table();
        table.set_quality(&t("plc/Insert"), Quality::Uncertain);
        table.write(&t("plc/Insert"), false, Instant::now()).unwrap();
        let sample = table.read(&t("plc/Insert"), Instant::now()).unwrap();
        assert_eq!(sample.quality, Quality::Good);
    }
}
