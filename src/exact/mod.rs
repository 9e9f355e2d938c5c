pub mod dd;
pub mod degree_pq;
pub mod fixed_order;
pub mod mdd;
pub mod mdd_stack;
mod rank;

pub use dd::*;
pub use degree_pq::*;
pub use fixed_order::*;
pub use mdd::*;
pub use mdd_stack::*;

use crate::{
    components::ArgStream,
    errors::Result,
    graph::{NumNodes, MAX_VERTS},
};

pub const PIVOT_MIN_CD: u8 = 0;
pub const PIVOT_MAX_CD: u8 = 1;
pub const PIVOT_MIN_MDD: u8 = 2;
pub const PIVOT_MAX_MDD: u8 = 3;

pub const RANK_ASCENDING: u8 = 0;
pub const RANK_DESCENDING: u8 = 1;

const INVALID_DEPTH: u32 = u32::MAX;

/// Outcome of the res/mod gate for one search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResmodVerdict {
    /// The node ordinal belongs to another worker; skip the subtree.
    Skip,
    /// Keep the subtree, the gate may still fire deeper down.
    KeepChecking,
    /// Keep the subtree; the gate can never fire again below this node.
    StopChecking,
}

/// State and knobs shared by all backtracking solvers: the res/mod
/// partition of the search tree, the solution size window, and the
/// per-depth node counters that drive the partition.
pub struct FrameworkCore {
    pub resmod_mod: u64,
    pub resmod_res: u64,
    pub resmod_depth: u32,

    /// Only sets of at least this size are reported
    pub lower_bound: NumNodes,
    /// No sets larger than this are reported
    pub upper_bound: NumNodes,

    depth_log: Vec<u64>,
    pub verbose: bool,
}

impl Default for FrameworkCore {
    fn default() -> Self {
        Self {
            resmod_mod: 1,
            resmod_res: 0,
            resmod_depth: INVALID_DEPTH,
            lower_bound: 0,
            upper_bound: MAX_VERTS as NumNodes,
            depth_log: Vec::new(),
            verbose: false,
        }
    }
}

impl FrameworkCore {
    pub fn reset_depth_log(&mut self) {
        self.depth_log.clear();
        self.depth_log.resize(MAX_VERTS + 1, 0);
    }

    /// Counts one entry at `depth` and decides the fate of the node. With
    /// `CHECK = false` the gate is compiled out of the hot path; callers
    /// switch to that flavor once [`ResmodVerdict::StopChecking`] is seen.
    #[inline]
    pub fn report_node<const CHECK: bool>(&mut self, depth: usize) -> ResmodVerdict {
        self.depth_log[depth] += 1;

        if !CHECK {
            return ResmodVerdict::StopChecking;
        }

        if depth as u32 == self.resmod_depth {
            if (self.depth_log[depth] - 1) % self.resmod_mod == self.resmod_res {
                ResmodVerdict::StopChecking
            } else {
                ResmodVerdict::Skip
            }
        } else {
            debug_assert!((depth as u32) < self.resmod_depth);
            ResmodVerdict::KeepChecking
        }
    }

    pub fn unreport_node(&mut self, depth: usize) {
        self.depth_log[depth] -= 1;
    }

    pub fn print_depth_log(&self) {
        if !self.verbose {
            return;
        }

        let max_depth = self
            .depth_log
            .iter()
            .rposition(|&c| c > 0)
            .unwrap_or_default();

        log::info!("depth log:");
        let mut total = 0u64;
        for (depth, &count) in self.depth_log.iter().enumerate().take(max_depth + 1) {
            log::info!("{depth:>3}: {count}");
            total += count;
        }
        log::info!("total logged calls: {total}");
    }

    /// Handles the sub-arguments every backtracking solver understands.
    pub fn accept_argument(&mut self, arg: &str, args: &mut ArgStream) -> Result<bool> {
        match arg {
            "-res" => self.resmod_res = args.next_u64()?,
            "-mod" => self.resmod_mod = args.next_u64()?,
            "-resmod_depth" => self.resmod_depth = args.next_u32()?,
            "-u" | "-max" => self.upper_bound = args.next_u32()?,
            "-l" | "-min" => self.lower_bound = args.next_u32()?,
            "-quiet" => self.verbose = false,
            "-verbose" => self.verbose = true,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
