//! Greedy sequential allocation, one unit commit at a time.
//!
//! [`Allocation`] owns working copies of the shipments and bins for a single
//! run. Each call to [`Allocation::step`] performs exactly one unit commit and
//! returns the matching [`PlacementEvent`]; between calls the full bin state is
//! readable through [`Allocation::bins`]. A consumer that stops calling `step`
//! leaves a consistent partial state that [`Allocation::into_result`] reports
//! like any finished run.
//!
//! # Algorithm
//!
//! 1. Shipments are stably sorted by descending unit volume.
//! 2. Each shipment sweeps the bins once, in input order.
//! 3. A bin that already holds a unit with the shipment's name when the sweep
//!    reaches it is skipped.
//! 4. Otherwise units are committed to the bin while [`fits`] holds and units
//!    remain, then the sweep moves on. A shipment can end up split across
//!    several bins.
//! 5. Whatever remains after the sweep is reported as unfit.

use u_binfit_core::{
    AllocationResult, Bin, Error, PlacementEvent, Result, Shipment, Snapshot,
};

use crate::aggregate::aggregate_unfit;
use crate::fit::fits;

/// Position of the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    shipment: usize,
    bin: usize,
    /// Whether the name guard already passed for the current bin.
    entered: bool,
}

impl Cursor {
    fn next_bin(&mut self) {
        self.bin += 1;
        self.entered = false;
    }

    fn next_shipment(&mut self) {
        self.shipment += 1;
        self.bin = 0;
        self.entered = false;
    }
}

/// State of one allocation run.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Working copies in processing order.
    shipments: Vec<Shipment>,
    /// Working copies in input order.
    bins: Vec<Bin>,
    total_units: usize,
    placements: usize,
    /// Always parked on the next admissible (shipment, bin) pair, or past the
    /// last shipment once nothing more can be committed.
    cursor: Cursor,
}

impl Allocation {
    /// Validates the inputs, orders the shipments and positions the sweep on
    /// the first commit.
    ///
    /// Bins must be empty. Fails before any state is touched if a shipment or
    /// bin is malformed.
    pub fn new(mut shipments: Vec<Shipment>, bins: Vec<Bin>) -> Result<Self> {
        for shipment in &shipments {
            shipment.validate()?;
        }
        for bin in &bins {
            bin.validate()?;
            if !bin.is_empty() {
                return Err(Error::InvalidBin(format!(
                    "'{}' already holds {} units",
                    bin.name(),
                    bin.items().len()
                )));
            }
        }

        for shipment in shipments.iter().filter(|s| !s.rotation().is_recognized()) {
            log::warn!(
                "Shipment '{}' has unrecognized rotation type '{}'; it will not be placed",
                shipment.name(),
                shipment.rotation()
            );
        }

        // `sort_by` is stable: equal volumes keep their input order.
        shipments.sort_by(|a, b| b.volume().total_cmp(&a.volume()));

        let total_units = shipments
            .iter()
            .try_fold(0usize, |total, s| total.checked_add(s.quantity()))
            .ok_or_else(|| {
                Error::InvalidShipment(format!(
                    "Total quantity over {} shipments exceeds {}",
                    shipments.len(),
                    usize::MAX
                ))
            })?;
        let mut allocation = Self {
            shipments,
            bins,
            total_units,
            placements: 0,
            cursor: Cursor::default(),
        };
        allocation.seek();
        Ok(allocation)
    }

    /// Commits the next unit and describes it, or returns `None` once the
    /// sweep is exhausted.
    pub fn step(&mut self) -> Option<PlacementEvent> {
        if self.is_finished() {
            return None;
        }
        let event = self.commit();
        self.seek();
        Some(event)
    }

    /// Runs the sweep to the end. Returns the number of commits performed.
    pub fn run(&mut self) -> usize {
        let mut commits = 0;
        while self.step().is_some() {
            commits += 1;
        }
        commits
    }

    /// Returns an iterator of owned full-state snapshots, one per commit.
    ///
    /// Dropping the iterator early leaves the allocation at the last yielded
    /// state.
    pub fn snapshots(&mut self) -> Snapshots<'_> {
        Snapshots { allocation: self }
    }

    /// Returns true when no further unit can be committed.
    pub fn is_finished(&self) -> bool {
        self.cursor.shipment >= self.shipments.len()
    }

    /// Returns the bins, in input order.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Returns the shipments in processing order with their outstanding
    /// quantities.
    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    /// Returns the number of commits performed so far.
    pub fn placements(&self) -> usize {
        self.placements
    }

    /// Returns the number of units requested in total.
    pub fn total_units(&self) -> usize {
        self.total_units
    }

    /// Returns the number of units not yet committed.
    pub fn remaining_units(&self) -> usize {
        self.total_units - self.placements
    }

    /// Consumes the run and reports final bins plus residual demand.
    ///
    /// If the sweep was not finished, shipments that were never reached are
    /// reported with their full quantity.
    pub fn into_result(self) -> AllocationResult {
        let unfit = aggregate_unfit(&self.shipments);
        let mut result = AllocationResult::new(self.bins, unfit);
        result.cancelled = self.cursor.shipment < self.shipments.len();
        result
    }

    /// Moves the cursor forward until the current (shipment, bin) pair admits
    /// a unit. Does not mutate shipments or bins.
    fn seek(&mut self) {
        while let Some(shipment) = self.shipments.get(self.cursor.shipment) {
            let Some(bin) = self.bins.get(self.cursor.bin) else {
                self.cursor.next_shipment();
                continue;
            };

            if shipment.quantity() == 0 {
                self.cursor.next_shipment();
                continue;
            }

            if !self.cursor.entered {
                if bin.holds(shipment.name()) {
                    self.cursor.next_bin();
                    continue;
                }
                self.cursor.entered = true;
            }

            if fits(bin, shipment) {
                return;
            }
            self.cursor.next_bin();
        }
    }

    /// Places one unit at the cursor. The cursor must be on an admissible
    /// pair.
    fn commit(&mut self) -> PlacementEvent {
        let shipment = &mut self.shipments[self.cursor.shipment];
        let bin = &mut self.bins[self.cursor.bin];

        bin.place(shipment.unit());
        shipment.take_unit();
        self.placements += 1;

        log::debug!(
            "Item {} placed in bin: {} (Quantity: 1)",
            shipment.name(),
            bin.name()
        );

        PlacementEvent {
            sequence: self.placements,
            bin_index: self.cursor.bin,
            bin_name: bin.name().to_string(),
            shipment_name: shipment.name().to_string(),
            rotation: shipment.rotation().clone(),
            remaining: shipment.quantity(),
        }
    }
}

/// Iterator over full-state snapshots of an [`Allocation`].
#[derive(Debug)]
pub struct Snapshots<'a> {
    allocation: &'a mut Allocation,
}

impl Iterator for Snapshots<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        let event = self.allocation.step()?;
        Some(Snapshot {
            event,
            bins: self.allocation.bins.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.allocation.is_finished() {
            (0, Some(0))
        } else {
            (1, Some(self.allocation.remaining_units()))
        }
    }
}
