// ABOUTME: Pair and string storage with mark-sweep garbage collection

//! The heap owns every pair cell and string the engine may reclaim.
//!
//! Both kinds live in arenas: a slot vector plus a free list of vacant
//! indices, so allocation is a `Vec` push or a free-list pop and handles
//! stay valid across collections. Each slot carries a mark bit. A
//! collection marks everything reachable from the roots the evaluator
//! passes in, then sweeps each arena, returning unmarked slots to its free
//! list and clearing the surviving marks for the next cycle.
//!
//! Marking uses an explicit worklist and is idempotent on a marked slot,
//! so cyclic structure cannot send it into a loop. Strings hold no
//! references and are leaves of the trace.

use crate::value::Value;

/// Handle to a pair cell. Also the backing handle for closures and
/// macros, which reuse the pair shape under a different tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairRef(u32);

/// Handle to a heap-owned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrRef(u32);

#[derive(Debug, Clone, Copy)]
struct PairCell {
    head: Value,
    tail: Value,
}

#[derive(Debug)]
struct PairSlot {
    marked: bool,
    cell: Option<PairCell>,
}

#[derive(Debug)]
struct StrSlot {
    marked: bool,
    text: Option<String>,
}

#[derive(Debug, Default)]
pub struct Heap {
    pairs: Vec<PairSlot>,
    free_pairs: Vec<u32>,
    strings: Vec<StrSlot>,
    free_strings: Vec<u32>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_pair(&mut self, head: Value, tail: Value) -> PairRef {
        let cell = Some(PairCell { head, tail });
        match self.free_pairs.pop() {
            Some(idx) => {
                self.pairs[idx as usize] = PairSlot { marked: false, cell };
                PairRef(idx)
            }
            None => {
                self.pairs.push(PairSlot { marked: false, cell });
                PairRef((self.pairs.len() - 1) as u32)
            }
        }
    }

    pub fn alloc_string(&mut self, text: impl Into<String>) -> StrRef {
        let text = Some(text.into());
        match self.free_strings.pop() {
            Some(idx) => {
                self.strings[idx as usize] = StrSlot { marked: false, text };
                StrRef(idx)
            }
            None => {
                self.strings.push(StrSlot { marked: false, text });
                StrRef((self.strings.len() - 1) as u32)
            }
        }
    }

    fn cell(&self, p: PairRef) -> &PairCell {
        self.pairs[p.0 as usize]
            .cell
            .as_ref()
            .expect("stale pair reference")
    }

    fn cell_mut(&mut self, p: PairRef) -> &mut PairCell {
        self.pairs[p.0 as usize]
            .cell
            .as_mut()
            .expect("stale pair reference")
    }

    pub fn car(&self, p: PairRef) -> Value {
        self.cell(p).head
    }

    pub fn cdr(&self, p: PairRef) -> Value {
        self.cell(p).tail
    }

    pub fn set_car(&mut self, p: PairRef, value: Value) {
        self.cell_mut(p).head = value;
    }

    pub fn set_cdr(&mut self, p: PairRef, value: Value) {
        self.cell_mut(p).tail = value;
    }

    pub fn text(&self, s: StrRef) -> &str {
        self.strings[s.0 as usize]
            .text
            .as_deref()
            .expect("stale string reference")
    }

    /// Marks every allocation reachable from `root`.
    pub fn mark(&mut self, root: Value) {
        let mut work = vec![root];
        while let Some(value) = work.pop() {
            match value {
                Value::Pair(p) | Value::Closure(p) | Value::Macro(p) => {
                    let slot = &mut self.pairs[p.0 as usize];
                    if slot.marked {
                        continue;
                    }
                    slot.marked = true;
                    if let Some(cell) = slot.cell {
                        work.push(cell.head);
                        work.push(cell.tail);
                    }
                }
                Value::String(s) => self.strings[s.0 as usize].marked = true,
                _ => {}
            }
        }
    }

    /// Frees every unmarked allocation and clears the surviving marks.
    pub fn sweep(&mut self) {
        for (idx, slot) in self.pairs.iter_mut().enumerate() {
            if slot.marked {
                slot.marked = false;
            } else if slot.cell.take().is_some() {
                self.free_pairs.push(idx as u32);
            }
        }
        for (idx, slot) in self.strings.iter_mut().enumerate() {
            if slot.marked {
                slot.marked = false;
            } else if slot.text.take().is_some() {
                self.free_strings.push(idx as u32);
            }
        }
    }

    /// Unconditionally frees everything; interpreter teardown.
    pub fn sweep_all(&mut self) {
        self.pairs.clear();
        self.free_pairs.clear();
        self.strings.clear();
        self.free_strings.clear();
    }

    pub fn live_pairs(&self) -> usize {
        self.pairs.iter().filter(|slot| slot.cell.is_some()).count()
    }

    pub fn live_strings(&self) -> usize {
        self.strings.iter().filter(|slot| slot.text.is_some()).count()
    }
}
