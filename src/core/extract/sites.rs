//! Candidate sites and the two site handlers that drive the walker.
//!
//! Pass 1 walks with a [`Collector`], which records every site and pretends it
//! resolved. Pass 2 walks the same tree with an [`Applier`] holding the resolved keys.
//! Both passes make identical decisions, so a site is found again by its [`SiteId`].

use std::collections::{HashMap, HashSet};

use swc_common::Span;
use tracing::warn;

use crate::core::stats::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    /// Plain string literal or JSX attribute string.
    Literal,
    /// Template literal or canonicalized `+` chain.
    Interpolated,
    /// JSX text child or a merged run of markup children.
    MarkupText,
}

impl std::fmt::Display for SiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteKind::Literal => write!(f, "literal"),
            SiteKind::Interpolated => write!(f, "interpolated"),
            SiteKind::MarkupText => write!(f, "markup-text"),
        }
    }
}

/// Kind-qualified span identity of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteId {
    pub lo: u32,
    pub hi: u32,
    pub kind: SiteKind,
}

impl SiteId {
    pub fn new(span: Span, kind: SiteKind) -> Self {
        Self {
            lo: span.lo.0,
            hi: span.hi.0,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSite {
    pub id: SiteId,
    /// Message text with `{name}` placeholders.
    pub text: String,
    pub kind: SiteKind,
    /// Byte offsets of the site inside the file.
    pub span_start: usize,
    pub span_end: usize,
    /// Interpolation names in order of first appearance.
    pub interpolation_vars: Vec<String>,
    pub location: Location,
    pub component_hint: Option<String>,
}

pub trait SiteHandler {
    /// Called for every site the walker finds. Returning `None` leaves the site as is.
    fn on_site(&mut self, site: CandidateSite) -> Option<String>;
}

/// Pass 1 handler.
#[derive(Debug, Default)]
pub struct Collector {
    seen: HashSet<SiteId>,
    sites: Vec<CandidateSite>,
}

impl Collector {
    pub fn into_sites(self) -> Vec<CandidateSite> {
        self.sites
    }
}

impl SiteHandler for Collector {
    fn on_site(&mut self, site: CandidateSite) -> Option<String> {
        if self.seen.insert(site.id) {
            self.sites.push(site);
        }
        Some(String::new())
    }
}

/// How well Pass 2 matched the sites of Pass 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteIntegrity {
    /// Sites found in Pass 2 that had no resolved key.
    pub unmatched: usize,
    /// Sites Pass 2 reached more than once.
    pub double_consumed: usize,
    /// Resolved sites Pass 2 never reached.
    pub unconsumed: usize,
}

impl SiteIntegrity {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Pass 2 handler.
#[derive(Debug)]
pub struct Applier {
    keys: HashMap<SiteId, String>,
    consumed: HashSet<SiteId>,
    integrity: SiteIntegrity,
}

impl Applier {
    pub fn new(keys: HashMap<SiteId, String>) -> Self {
        Self {
            keys,
            consumed: HashSet::new(),
            integrity: SiteIntegrity::default(),
        }
    }

    pub fn finish(self) -> SiteIntegrity {
        let mut integrity = self.integrity;
        integrity.unconsumed = self
            .keys
            .keys()
            .filter(|id| !self.consumed.contains(id))
            .count();
        integrity
    }
}

impl SiteHandler for Applier {
    fn on_site(&mut self, site: CandidateSite) -> Option<String> {
        if !self.consumed.insert(site.id) {
            self.integrity.double_consumed += 1;
            warn!(
                "{} site at {} reached twice; second replacement skipped",
                site.kind, site.location
            );
            return None;
        }
        match self.keys.get(&site.id) {
            Some(key) => Some(key.clone()),
            None => {
                self.integrity.unmatched += 1;
                warn!(
                    "{} site at {} has no assigned key; left untouched",
                    site.kind, site.location
                );
                None
            }
        }
    }
}
