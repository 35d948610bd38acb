//! Fresh temporary names for one function (or program) scope.

use rustc_hash::FxHashSet;

/// Temporaries allocated in one var scope.
///
/// Names run `_a` .. `_z`, then `_a1` .. `_z1`, and so on, skipping any name
/// that already occurs in the program. The counter only moves forward and
/// every allocated name is recorded for hoisting.
#[derive(Debug)]
pub struct TempScope<'a> {
    reserved: &'a FxHashSet<String>,
    counter: u32,
    declared: Vec<String>,
}

impl<'a> TempScope<'a> {
    pub fn new(reserved: &'a FxHashSet<String>) -> Self {
        Self {
            reserved,
            counter: 0,
            declared: Vec::new(),
        }
    }

    /// Allocate and record the next free temporary name.
    pub fn fresh(&mut self) -> String {
        loop {
            let candidate = Self::name_for(self.counter);
            self.counter += 1;
            if !self.reserved.contains(&candidate) {
                self.declared.push(candidate.clone());
                return candidate;
            }
        }
    }

    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    pub fn into_declared(self) -> Vec<String> {
        self.declared
    }

    fn name_for(counter: u32) -> String {
        let letter = (b'a' + (counter % 26) as u8) as char;
        match counter / 26 {
            0 => format!("_{letter}"),
            round => format!("_{letter}{round}"),
        }
    }
}
