//! Text rendering of the whole structure
//!
//! ```text
//! Array snapshot:
//! 1, _, 2, _, 5, ...
//! is_leaf: false, size: 5, depth: 0, tau: 0.0391, tau_k: 0.5000, win_start: 0, win_end: 127
//! ...
//! ```

use std::fmt;

use crate::Lla;

impl fmt::Display for Lla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Array snapshot:")?;
        for (i, slot) in self.slots().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Some(value) => write!(f, "{value}")?,
                None => write!(f, "_")?,
            }
        }
        writeln!(f)?;

        for (_, node) in self.tree().pre_order() {
            writeln!(f, "{node}")?;
        }

        Ok(())
    }
}
